//! Shared test fixtures: an in-process relay bound to an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;

use futures_util::StreamExt;
use realtime_server::ServerConfig;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Relay server running inside the test runtime.
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            realtime_server::serve(listener, &config, async move {
                let _ = shutdown_rx.await;
            })
            .await
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    /// `host:port` as used by the client
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, uuid: &str, channel: &str) -> String {
        format!("ws://{}/realtime/{}/{}/", self.addr, uuid, channel)
    }

    pub async fn connect(&self, uuid: &str, channel: &str) -> WsStream {
        let (ws, _) = connect_async(self.ws_url(uuid, channel))
            .await
            .expect("Failed to connect");
        ws
    }

    /// Trigger graceful shutdown and wait for the server task to end
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Next text frame parsed as JSON, skipping control frames
pub async fn next_json(ws: &mut WsStream) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(std::time::Duration::from_secs(5), ws.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Stream ended")
            .expect("WebSocket error");
        match msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
            Message::Close(frame) => panic!("Unexpected close: {:?}", frame),
            _ => continue,
        }
    }
}

/// Read frames until a subscribers message listing `count` ids arrives
pub async fn wait_for_subscribers(ws: &mut WsStream, count: usize) -> Vec<String> {
    loop {
        let value = next_json(ws).await;
        if let Some(uuids) = value.get("uuids").and_then(|v| v.as_array())
            && uuids.len() == count
        {
            return uuids
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
        }
    }
}
