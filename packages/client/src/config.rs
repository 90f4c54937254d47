//! Client configuration.

use realtime_shared::route::DEFAULT_HOST;

/// Where the client connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host:port` of the relay, without scheme
    pub host: String,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}
