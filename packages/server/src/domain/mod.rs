//! Domain layer for the relay.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use entity::{Channel, DEFAULT_SUBSCRIBER_CAPACITY, Subscriber};
pub use error::{ChannelError, RepositoryError};
pub use repository::ChannelRepository;
pub use value_object::Timestamp;

pub use realtime_shared::{ChannelName, ClientId, ValueObjectError};
