//! Connection wrapper around a single WebSocket.

use std::time::Duration;

use futures_util::{sink::SinkExt, stream::StreamExt};
use realtime_shared::{ChannelName, ClientId, ClientIdFactory, route::realtime_url};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::{config::ClientConfig, error::ClientError};

/// How long to wait for the peer to drop the connection once close frames are exchanged
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Callbacks for one connection.
///
/// Only `on_message` is required. All callbacks for a connection run one at a
/// time, in arrival order, on the connection task.
pub trait MessageHandler: Send + 'static {
    /// Called once per inbound text frame with its parsed JSON content.
    fn on_message(&mut self, message: Value);

    /// Called once when the socket opens, before any `on_message`.
    fn on_open(&mut self) {}

    /// Called once when the socket closes or fails to open. Nothing is called after it.
    fn on_close(&mut self) {}
}

impl<F> MessageHandler for F
where
    F: FnMut(Value) + Send + 'static,
{
    fn on_message(&mut self, message: Value) {
        self(message)
    }
}

/// Handle to one socket on one channel.
///
/// The connection lives until the server closes it, the network fails, or the
/// handle is dropped. There is no reconnection.
pub struct SocketHandler {
    client_id: ClientId,
    channel: ChannelName,
    url: String,
    outbox: mpsc::UnboundedSender<String>,
    closed: watch::Receiver<bool>,
}

impl SocketHandler {
    /// Open a socket on `channel` and start delivering frames to `handler`.
    ///
    /// Returns immediately; the handshake runs on a spawned task. Must be
    /// called within a Tokio runtime.
    pub fn open<H>(config: &ClientConfig, channel: ChannelName, handler: H) -> Self
    where
        H: MessageHandler,
    {
        let client_id = ClientIdFactory::generate();
        let url = realtime_url(&config.host, &client_id, &channel);

        let (outbox, outbox_rx) = mpsc::unbounded_channel();
        let (closed_tx, closed) = watch::channel(false);

        tracing::debug!("Connecting to {}", url);
        tokio::spawn(run_connection(url.clone(), handler, outbox_rx, closed_tx));

        Self {
            client_id,
            channel,
            url,
            outbox,
            closed,
        }
    }

    /// Queue `message` for transmission as one JSON text frame.
    ///
    /// Only objects and arrays are accepted. Frames queued before the socket
    /// opens are sent, in order, once it does. Never blocks.
    pub fn send<T>(&self, message: &T) -> Result<(), ClientError>
    where
        T: Serialize + ?Sized,
    {
        let text = encode_payload(message)?;
        self.outbox.send(text).map_err(|_| ClientError::Closed)
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn channel(&self) -> &ChannelName {
        &self.channel
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the connection has ended.
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Wait until the connection has ended and `on_close` has been called.
    pub async fn closed(&self) {
        let mut closed = self.closed.clone();
        // Err means the task is gone, which also means closed
        let _ = closed.wait_for(|closed| *closed).await;
    }

    /// Start the close handshake and wait until the connection has ended.
    pub async fn close(self) {
        let Self {
            outbox, mut closed, ..
        } = self;
        drop(outbox);
        let _ = closed.wait_for(|closed| *closed).await;
    }
}

/// Serialize `message`, refusing anything that is not an object or array.
fn encode_payload<T>(message: &T) -> Result<String, ClientError>
where
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(message)?;
    match text.as_bytes().first() {
        Some(b'{') | Some(b'[') => Ok(text),
        Some(b'n') => Err(ClientError::InvalidPayload("null")),
        Some(b't') | Some(b'f') => Err(ClientError::InvalidPayload("boolean")),
        Some(b'"') => Err(ClientError::InvalidPayload("string")),
        _ => Err(ClientError::InvalidPayload("number")),
    }
}

async fn run_connection<H>(
    url: String,
    mut handler: H,
    mut outbox: mpsc::UnboundedReceiver<String>,
    closed: watch::Sender<bool>,
) where
    H: MessageHandler,
{
    let socket = match connect_async(url.as_str()).await {
        Ok((socket, _response)) => socket,
        Err(e) => {
            tracing::warn!("Failed to connect to {}: {}", url, e);
            outbox.close();
            closed.send_replace(true);
            tracing::info!("close");
            handler.on_close();
            return;
        }
    };

    tracing::info!("open");
    handler.on_open();

    let (mut sink, mut stream) = socket.split();
    let mut outbox_open = true;

    loop {
        tokio::select! {
            frame = stream.next() => {
                let frame = match frame {
                    Some(Ok(frame)) => frame,
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                };

                match frame {
                    Message::Text(text) => match serde_json::from_str::<Value>(text.as_str()) {
                        Ok(message) => {
                            tracing::debug!("Received: {}", message);
                            handler.on_message(message);
                        }
                        Err(e) => {
                            tracing::error!("Dropping frame that is not valid JSON: {}", e);
                        }
                    },
                    Message::Close(frame) => {
                        tracing::debug!("Close frame received: {:?}", frame);
                        // Keep reading so the queued close reply is flushed
                        let drain = async { while let Some(Ok(_)) = stream.next().await {} };
                        if tokio::time::timeout(CLOSE_TIMEOUT, drain).await.is_err() {
                            tracing::debug!("Peer kept the connection open after close");
                        }
                        break;
                    }
                    _ => {}
                }
            }
            outgoing = outbox.recv(), if outbox_open => match outgoing {
                Some(text) => {
                    if let Err(e) = sink.send(Message::Text(text.into())).await {
                        tracing::warn!("Failed to send frame: {}", e);
                        break;
                    }
                }
                None => {
                    // Handle dropped; start the close handshake and drain until the server answers
                    outbox_open = false;
                    if let Err(e) = sink.close().await {
                        tracing::debug!("Close handshake failed: {}", e);
                        break;
                    }
                }
            },
        }
    }

    outbox.close();
    closed.send_replace(true);
    tracing::info!("close");
    handler.on_close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Item {
        text: String,
        created: String,
    }

    #[test]
    fn test_encode_payload_object() {
        // テスト項目: オブジェクトはそのまま JSON 文字列になる
        // given (前提条件):
        let item = Item {
            text: "Hi".to_string(),
            created: "2024-01-01".to_string(),
        };

        // when (操作):
        let result = encode_payload(&item);

        // then (期待する結果): フィールド順も保持される
        assert_eq!(result.unwrap(), r#"{"text":"Hi","created":"2024-01-01"}"#);
    }

    #[test]
    fn test_encode_payload_array() {
        // テスト項目: 配列も構造化された値として受け付ける
        let result = encode_payload(&json!([1, {"a": 2}]));

        assert_eq!(result.unwrap(), r#"[1,{"a":2}]"#);
    }

    #[test]
    fn test_encode_payload_rejects_scalars() {
        // テスト項目: null / 真偽値 / 数値 / 文字列は InvalidPayload になる
        let cases: Vec<(Value, &str)> = vec![
            (Value::Null, "null"),
            (json!(true), "boolean"),
            (json!(false), "boolean"),
            (json!(42), "number"),
            (json!(-1.5), "number"),
            (json!("hello"), "string"),
        ];

        for (value, kind) in cases {
            // when (操作):
            let result = encode_payload(&value);

            // then (期待する結果):
            match result {
                Err(ClientError::InvalidPayload(actual)) => assert_eq!(actual, kind),
                other => panic!("expected InvalidPayload for {value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_encode_payload_rejects_unit_and_option_none() {
        // テスト項目: Rust の () と None は null として拒否される
        assert!(matches!(
            encode_payload(&()),
            Err(ClientError::InvalidPayload("null"))
        ));
        assert!(matches!(
            encode_payload(&Option::<u8>::None),
            Err(ClientError::InvalidPayload("null"))
        ));
    }

    #[test]
    fn test_closure_is_a_message_handler() {
        // テスト項目: クロージャを on_message だけのハンドラとして使える
        // given (前提条件):
        let (tx, rx) = std::sync::mpsc::channel();
        let mut handler = move |message: Value| tx.send(message).unwrap();

        // when (操作):
        handler.on_open();
        MessageHandler::on_message(&mut handler, json!({"a": 1}));
        handler.on_close();
        drop(handler);

        // then (期待する結果):
        assert_eq!(rx.iter().collect::<Vec<_>>(), vec![json!({"a": 1})]);
    }
}
