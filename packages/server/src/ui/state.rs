//! Server state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::ChannelRepository;

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn ChannelRepository>,
    /// Flipped to `true` once the server starts shutting down
    pub shutdown: watch::Sender<bool>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ChannelRepository>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            repository,
            shutdown,
        }
    }
}
