//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Channel domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Channel capacity exceeded error
    #[error("Channel capacity exceeded: maximum {capacity} subscribers allowed (current: {current})")]
    CapacityExceeded { capacity: usize, current: usize },

    /// The client is already subscribed to the channel
    #[error("Client '{0}' is already subscribed")]
    DuplicateSubscriber(String),
}

/// Errors raised by a [`super::ChannelRepository`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Channel '{0}' not found")]
    ChannelNotFound(String),

    #[error("Subscriber '{0}' not found")]
    SubscriberNotFound(String),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
