//! Page bootstrap: subscribe to a channel and render chat messages.
//!
//! Every inbound message carrying both `text` and `created` becomes one
//! `<h4 class="well">` fragment prepended to the `messages` container.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

use realtime_shared::ChannelName;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    config::ClientConfig,
    handler::{MessageHandler, SocketHandler},
};

/// Render one chat message. Both values are interpolated verbatim.
pub fn render_fragment(text: &str, created: &str) -> String {
    format!(r#"<h4 class="well"><strong>{text}</strong> - <em>{created}</em></h4>"#)
}

/// The display container of class `messages`. Newest fragment first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBoard {
    fragments: VecDeque<String>,
}

impl MessageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `fragment` before every existing one.
    pub fn prepend(&mut self, fragment: String) {
        self.fragments.push_front(fragment);
    }

    /// Fragments in display order (newest first).
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The container with its fragments, as HTML.
    pub fn to_html(&self) -> String {
        let inner: String = self.fragments().collect();
        format!(r#"<div class="messages">{inner}</div>"#)
    }
}

/// [`MessageHandler`] that renders chat messages onto a shared [`MessageBoard`].
pub struct MessageFeed {
    board: Arc<Mutex<MessageBoard>>,
    listener: Option<mpsc::UnboundedSender<String>>,
}

impl MessageFeed {
    pub fn new(board: Arc<Mutex<MessageBoard>>) -> Self {
        Self {
            board,
            listener: None,
        }
    }

    /// Also forward each rendered fragment to `listener`.
    pub fn with_listener(mut self, listener: mpsc::UnboundedSender<String>) -> Self {
        self.listener = Some(listener);
        self
    }
}

impl MessageHandler for MessageFeed {
    fn on_message(&mut self, message: Value) {
        let Some(fragment) = fragment_for(&message) else {
            tracing::debug!("Not rendered (no text/created): {}", message);
            return;
        };

        self.board
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .prepend(fragment.clone());

        if let Some(listener) = &self.listener
            && listener.send(fragment).is_err()
        {
            tracing::debug!("Fragment listener is gone");
        }
    }
}

/// Fragment for `message`, if both `text` and `created` are present and truthy.
fn fragment_for(message: &Value) -> Option<String> {
    let text = field_text(message.get("text")?)?;
    let created = field_text(message.get("created")?)?;
    Some(render_fragment(&text, &created))
}

/// Display text of a truthy scalar; `None` for empty, zero, false, null and containers.
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// A loaded page: one socket plus the board it renders onto.
///
/// The page owns its connection; callers reach it through [`Page::socket`].
pub struct Page {
    socket: SocketHandler,
    board: Arc<Mutex<MessageBoard>>,
}

impl Page {
    /// Load the page on the `messages` channel.
    pub fn load(config: &ClientConfig) -> Self {
        Self::open(config, ChannelName::messages(), None)
    }

    /// Load the page on `channel`, optionally forwarding rendered fragments to `listener`.
    pub fn open(
        config: &ClientConfig,
        channel: ChannelName,
        listener: Option<mpsc::UnboundedSender<String>>,
    ) -> Self {
        let board = Arc::new(Mutex::new(MessageBoard::new()));
        let mut feed = MessageFeed::new(board.clone());
        if let Some(listener) = listener {
            feed = feed.with_listener(listener);
        }

        let socket = SocketHandler::open(config, channel, feed);
        Self { socket, board }
    }

    pub fn socket(&self) -> &SocketHandler {
        &self.socket
    }

    /// Close the page's connection and wait for it to end.
    pub async fn close(self) {
        self.socket.close().await
    }

    /// Snapshot of the board.
    pub fn board(&self) -> MessageBoard {
        self.board
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The `messages` container as HTML.
    pub fn html(&self) -> String {
        self.board().to_html()
    }
}
