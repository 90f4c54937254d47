//! Repository trait for channel subscriptions.
//!
//! The domain defines the interface; `infrastructure::repository` implements it.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::{Channel, ChannelName, ClientId, RepositoryError, Timestamp};

/// Storage for channels, their subscribers and each subscriber's outbox.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Subscribe `client_id` to `channel`, creating the channel if needed.
    async fn add_subscriber(
        &self,
        channel: ChannelName,
        client_id: ClientId,
        sender: UnboundedSender<String>,
        joined_at: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// Unsubscribe `client_id`. Channels left empty are dropped.
    async fn remove_subscriber(
        &self,
        channel: &ChannelName,
        client_id: &ClientId,
    ) -> Result<(), RepositoryError>;

    /// Subscriber ids of `channel` in join order (empty if the channel does not exist).
    async fn subscriber_ids(&self, channel: &ChannelName) -> Vec<ClientId>;

    /// Outboxes of every subscriber of `channel`, in join order.
    async fn subscriber_senders(
        &self,
        channel: &ChannelName,
    ) -> Vec<(ClientId, UnboundedSender<String>)>;

    /// All open channels, sorted by name.
    async fn list_channels(&self) -> Vec<Channel>;
}
