//! Page end-to-end tests through a live relay server.

use std::time::Duration;

use realtime_client::{ClientConfig, Page, SocketHandler, render_fragment};
use realtime_server::ServerConfig;
use realtime_shared::ChannelName;
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::mpsc};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn start_relay() -> ClientConfig {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let host = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let config = ServerConfig::default();
        realtime_server::serve(listener, &config, std::future::pending()).await
    });
    ClientConfig::new(host)
}

/// Open a second socket on `channel` and wait until it sees `expected` subscribers.
async fn open_publisher(config: &ClientConfig, channel: ChannelName, expected: usize) -> SocketHandler {
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
    let publisher = SocketHandler::open(config, channel, move |message: Value| {
        let _ = tx.send(message);
    });

    loop {
        let message = tokio::time::timeout(TIMEOUT, rx.recv())
            .await
            .expect("Timed out waiting for subscribers")
            .expect("Publisher closed");
        if message["uuids"].as_array().map(Vec::len) == Some(expected) {
            return publisher;
        }
    }
}

async fn next_fragment(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    tokio::time::timeout(TIMEOUT, rx.recv())
        .await
        .expect("Timed out waiting for a fragment")
        .expect("Page closed")
}

#[tokio::test]
async fn test_page_renders_relayed_message() {
    // テスト項目: 別クライアントが送ったメッセージがページに描画される
    // given (前提条件):
    let config = start_relay().await;
    let (fragment_tx, mut fragments) = mpsc::unbounded_channel();
    let page = Page::open(&config, ChannelName::messages(), Some(fragment_tx));
    let publisher = open_publisher(&config, ChannelName::messages(), 2).await;

    // when (操作):
    publisher
        .send(&json!({"text": "Hi", "created": "2024-01-01"}))
        .unwrap();

    // then (期待する結果): 購読者リストは描画されず、メッセージだけが 1 件載る
    let expected = render_fragment("Hi", "2024-01-01");
    assert_eq!(next_fragment(&mut fragments).await, expected);
    assert_eq!(page.board().len(), 1);
    assert!(page.html().contains(&expected));
}

#[tokio::test]
async fn test_page_shows_newest_first() {
    // テスト項目: 新しいメッセージが先頭に追加される
    // given (前提条件):
    let config = start_relay().await;
    let (fragment_tx, mut fragments) = mpsc::unbounded_channel();
    let page = Page::open(&config, ChannelName::messages(), Some(fragment_tx));
    let publisher = open_publisher(&config, ChannelName::messages(), 2).await;

    // when (操作):
    publisher
        .send(&json!({"text": "first", "created": "2024-01-01"}))
        .unwrap();
    publisher
        .send(&json!({"text": "second", "created": "2024-01-02"}))
        .unwrap();
    next_fragment(&mut fragments).await;
    next_fragment(&mut fragments).await;

    // then (期待する結果):
    let board = page.board();
    let rendered: Vec<&str> = board.fragments().collect();
    assert_eq!(
        rendered,
        vec![
            render_fragment("second", "2024-01-02"),
            render_fragment("first", "2024-01-01"),
        ]
    );
}

#[tokio::test]
async fn test_page_ignores_other_channels() {
    // テスト項目: 別チャンネルのメッセージはページに届かない
    // given (前提条件):
    let config = start_relay().await;
    let (fragment_tx, mut fragments) = mpsc::unbounded_channel();
    let page = Page::open(&config, ChannelName::messages(), Some(fragment_tx));
    let other = open_publisher(&config, ChannelName::new("other".to_string()).unwrap(), 1).await;
    let publisher = open_publisher(&config, ChannelName::messages(), 2).await;

    // when (操作):
    other
        .send(&json!({"text": "elsewhere", "created": "2024-01-01"}))
        .unwrap();
    publisher
        .send(&json!({"text": "here", "created": "2024-01-01"}))
        .unwrap();

    // then (期待する結果):
    assert_eq!(
        next_fragment(&mut fragments).await,
        render_fragment("here", "2024-01-01")
    );
    assert_eq!(page.board().len(), 1);
}

#[tokio::test]
async fn test_loaded_page_renders_messages_channel() {
    // テスト項目: load() は messages チャンネルに接続し、届いたメッセージを描画する
    // given (前提条件):
    let config = start_relay().await;
    let page = Page::load(&config);
    assert_eq!(page.socket().channel(), &ChannelName::messages());
    let publisher = open_publisher(&config, ChannelName::messages(), 2).await;

    // when (操作):
    publisher
        .send(&json!({"text": "loaded", "created": "2024-01-01"}))
        .unwrap();

    // then (期待する結果): リスナーがないので描画結果をポーリングする
    let expected = render_fragment("loaded", "2024-01-01");
    tokio::time::timeout(TIMEOUT, async {
        while !page.html().contains(&expected) {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("Message was not rendered");
    assert_eq!(page.board().len(), 1);
}
