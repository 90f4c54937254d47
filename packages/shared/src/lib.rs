//! Shared library for the realtime channel client and relay server.
//!
//! Holds the pieces both sides must agree on: identifiers, channel names,
//! the socket URL template, time formatting and logger setup.

pub mod domain;
pub mod logger;
pub mod route;
pub mod time;

pub use domain::{ChannelName, ClientId, ClientIdFactory, ValueObjectError};
