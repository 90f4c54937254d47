//! Server configuration.

use crate::domain::DEFAULT_SUBSCRIBER_CAPACITY;

/// Listen address and channel limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum subscribers per channel
    pub channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            channel_capacity: DEFAULT_SUBSCRIBER_CAPACITY,
        }
    }
}
