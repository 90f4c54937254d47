//! InMemory repository implementations.

mod channel;

pub use channel::InMemoryChannelRepository;
