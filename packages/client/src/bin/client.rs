//! CLI front end for the realtime channel client.
//!
//! Loads the message page on a channel, prints every rendered message and
//! sends each line typed on stdin as `{"text": ..., "created": ...}`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin realtime-client -- --host localhost:8080 --channel messages
//! ```

use std::time::Duration;

use clap::Parser;
use realtime_client::{ClientConfig, ClientError, Page};
use realtime_shared::{
    ChannelName, ValueObjectError, logger::setup_logger, route::DEFAULT_HOST, time::today_label,
};
use rustyline::{DefaultEditor, error::ReadlineError};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(name = "realtime-client", version, about = "Realtime channel client")]
struct ClientArgs {
    /// Relay address as host:port
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Channel to subscribe to
    #[arg(short, long, default_value = ChannelName::MESSAGES)]
    channel: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid channel: {0}")]
    Channel(#[from] ValueObjectError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Outgoing chat item
#[derive(Debug, Serialize)]
struct ChatItem<'a> {
    text: &'a str,
    created: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = ClientArgs::parse();
    if let Err(e) = run(args).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: ClientArgs) -> Result<(), CliError> {
    let channel = ChannelName::new(args.channel)?;
    let config = ClientConfig::new(args.host);

    let (fragment_tx, mut fragments) = mpsc::unbounded_channel();
    let page = Page::open(&config, channel, Some(fragment_tx));
    tracing::info!(
        "Client '{}' joining {}",
        page.socket().client_id(),
        page.socket().url()
    );

    let (line_tx, mut lines) = mpsc::unbounded_channel();
    spawn_line_reader(line_tx);

    loop {
        tokio::select! {
            Some(fragment) = fragments.recv() => println!("{fragment}"),
            line = lines.recv() => match line {
                Some(line) => {
                    let text = line.trim();
                    if text.is_empty() {
                        continue;
                    }
                    page.socket().send(&ChatItem {
                        text,
                        created: today_label(),
                    })?;
                }
                None => {
                    tracing::info!("Input closed, leaving");
                    break;
                }
            },
            _ = page.socket().closed() => {
                tracing::info!("Connection closed by server");
                break;
            }
        }
    }

    if tokio::time::timeout(Duration::from_secs(2), page.close())
        .await
        .is_err()
    {
        tracing::warn!("Timed out waiting for the connection to close");
    }

    Ok(())
}

/// Read stdin lines on a blocking thread and forward them to `tx`.
fn spawn_line_reader(tx: mpsc::UnboundedSender<String>) {
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to start line editor: {}", e);
                return;
            }
        };

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::warn!("Failed to read line: {}", e);
                    break;
                }
            }
        }
    });
}
