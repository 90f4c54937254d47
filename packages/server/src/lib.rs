//! Realtime channel relay.
//!
//! Accepts WebSocket subscribers on `/realtime/{uuid}/{channel}/` and fans every
//! JSON object received on a channel out to all of its subscribers.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{run, serve};
