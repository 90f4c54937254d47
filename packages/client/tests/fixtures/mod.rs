//! Shared test fixtures: a one-shot WebSocket peer and a recording handler.

#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use realtime_client::MessageHandler;
use serde_json::Value;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::mpsc,
};
use tokio_tungstenite::{
    WebSocketStream, accept_hdr_async,
    tungstenite::{
        Message,
        handshake::server::{ErrorResponse, Request, Response},
    },
};

const TIMEOUT: Duration = Duration::from_secs(5);

/// What a [`Recorder`] saw, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Open,
    Message(Value),
    Close,
}

/// Handler that forwards every callback to a channel.
pub struct Recorder {
    tx: mpsc::UnboundedSender<Event>,
}

impl Recorder {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MessageHandler for Recorder {
    fn on_message(&mut self, message: Value) {
        let _ = self.tx.send(Event::Message(message));
    }

    fn on_open(&mut self) {
        let _ = self.tx.send(Event::Open);
    }

    fn on_close(&mut self) {
        let _ = self.tx.send(Event::Close);
    }
}

pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Option<Event> {
    tokio::time::timeout(TIMEOUT, rx.recv())
        .await
        .expect("Timed out waiting for an event")
}

/// Every remaining event until the handler is dropped
pub async fn drain_events(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(event) = next_event(rx).await {
        events.push(event);
    }
    events
}

/// WebSocket server on an ephemeral port that accepts a single client.
pub struct CaptureServer {
    listener: TcpListener,
}

impl CaptureServer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        Self { listener }
    }

    /// `host:port` as used by the client
    pub fn host(&self) -> String {
        self.listener
            .local_addr()
            .expect("Failed to read local addr")
            .to_string()
    }

    pub async fn accept(self) -> Peer {
        let (stream, _) = tokio::time::timeout(TIMEOUT, self.listener.accept())
            .await
            .expect("Timed out waiting for a client")
            .expect("Failed to accept");

        let mut path = String::new();
        let ws = accept_hdr_async(
            stream,
            |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                path = request.uri().path().to_string();
                Ok(response)
            },
        )
        .await
        .expect("Handshake failed");

        Peer { path, ws }
    }
}

/// Server side of one accepted connection.
pub struct Peer {
    pub path: String,
    ws: WebSocketStream<TcpStream>,
}

impl Peer {
    pub async fn send_text(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send");
    }

    /// Next text frame as received, or `None` once the client has closed.
    pub async fn recv_text(&mut self) -> Option<String> {
        loop {
            let msg = tokio::time::timeout(TIMEOUT, self.ws.next())
                .await
                .expect("Timed out waiting for a frame");
            match msg {
                Some(Ok(Message::Text(text))) => return Some(text.as_str().to_string()),
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return None,
                Some(Ok(_)) => continue,
            }
        }
    }

    /// Close from the server side; the client must answer with a close frame.
    pub async fn close(mut self) {
        self.ws.close(None).await.expect("Failed to close");
        loop {
            let msg = tokio::time::timeout(TIMEOUT, self.ws.next())
                .await
                .expect("Timed out waiting for the close reply");
            match msg {
                Some(Ok(Message::Close(_))) => return,
                Some(Ok(_)) => continue,
                other => panic!("Expected a close reply, got {:?}", other),
            }
        }
    }

    /// Wait for the client's close frame and answer it.
    pub async fn expect_close(mut self) {
        loop {
            let msg = tokio::time::timeout(TIMEOUT, self.ws.next())
                .await
                .expect("Timed out waiting for a close frame");
            match msg {
                Some(Ok(Message::Close(_))) => break,
                Some(Ok(_)) => continue,
                other => panic!("Expected a close frame, got {:?}", other),
            }
        }
        // Reading again flushes the queued reply
        let _ = tokio::time::timeout(TIMEOUT, self.ws.next()).await;
    }
}
