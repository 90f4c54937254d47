//! Core domain models for the relay.

use serde::{Deserialize, Serialize};

use super::{
    ChannelName, ClientId,
    error::ChannelError,
    value_object::Timestamp,
};

/// Default maximum number of subscribers allowed on a channel
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 100;

/// A channel and the clients subscribed to it, in join order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// Channel name (URL path segment)
    pub name: ChannelName,
    /// Subscribers in the order they joined
    pub subscribers: Vec<Subscriber>,
    /// Timestamp when the first subscriber opened the channel
    pub created_at: Timestamp,
    /// Maximum number of subscribers allowed
    pub capacity: usize,
}

impl Channel {
    /// Create a new empty channel
    pub fn new(name: ChannelName, created_at: Timestamp) -> Self {
        Self::with_capacity(name, created_at, DEFAULT_SUBSCRIBER_CAPACITY)
    }

    /// Create a new empty channel with a custom capacity
    pub fn with_capacity(name: ChannelName, created_at: Timestamp, capacity: usize) -> Self {
        Self {
            name,
            subscribers: Vec::new(),
            created_at,
            capacity,
        }
    }

    /// Append a subscriber
    ///
    /// # Errors
    ///
    /// `DuplicateSubscriber` if the id is already on the channel,
    /// `CapacityExceeded` if the channel is full
    pub fn add_subscriber(&mut self, subscriber: Subscriber) -> Result<(), ChannelError> {
        if self.contains(&subscriber.id) {
            return Err(ChannelError::DuplicateSubscriber(
                subscriber.id.into_string(),
            ));
        }
        if self.subscribers.len() >= self.capacity {
            return Err(ChannelError::CapacityExceeded {
                capacity: self.capacity,
                current: self.subscribers.len(),
            });
        }
        self.subscribers.push(subscriber);
        Ok(())
    }

    /// Remove a subscriber by ID. Returns whether it was present.
    pub fn remove_subscriber(&mut self, client_id: &ClientId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| &s.id != client_id);
        self.subscribers.len() != before
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.subscribers.iter().any(|s| &s.id == client_id)
    }

    /// Subscriber ids in join order
    pub fn subscriber_ids(&self) -> Vec<ClientId> {
        self.subscribers.iter().map(|s| s.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

/// A client subscribed to a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Client identifier taken from the socket URL
    pub id: ClientId,
    /// Timestamp when the subscriber joined
    pub joined_at: Timestamp,
}

impl Subscriber {
    pub fn new(id: ClientId, joined_at: Timestamp) -> Self {
        Self { id, joined_at }
    }
}
