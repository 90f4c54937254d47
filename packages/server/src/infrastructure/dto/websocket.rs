//! WebSocket message DTOs for the relay.
//!
//! Frames are free-form JSON objects. The relay only adds `uuid` and `time`
//! to each one, and produces the subscriber list message itself.

use serde::{Deserialize, Serialize};

/// Key holding the sender's client id (`null` for server-originated messages)
pub const SENDER_KEY: &str = "uuid";

/// Key holding the relay's clock label
pub const TIME_KEY: &str = "time";

/// Subscriber list broadcast whenever someone joins or leaves a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribersMessage {
    /// Client ids in join order
    pub uuids: Vec<String>,
}
