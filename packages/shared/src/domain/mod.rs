//! Value objects shared by client and server.

pub mod error;
pub mod factory;
pub mod value_object;

pub use error::ValueObjectError;
pub use factory::ClientIdFactory;
pub use value_object::{ChannelName, ClientId};
