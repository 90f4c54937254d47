//! Realtime channel relay.
//!
//! Relays JSON objects between the WebSocket subscribers of each channel.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin realtime-server -- --port 8080
//! ```

use clap::Parser;
use realtime_server::ServerConfig;
use realtime_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "realtime-server", version, about = "Realtime channel relay")]
struct ServerArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Maximum subscribers per channel
    #[arg(long, default_value_t = realtime_server::domain::DEFAULT_SUBSCRIBER_CAPACITY)]
    capacity: usize,
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            channel_capacity: args.capacity,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(ServerArgs::parse());

    // Run the server
    if let Err(e) = realtime_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
