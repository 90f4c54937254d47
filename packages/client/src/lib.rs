//! WebSocket channel client.
//!
//! [`SocketHandler`] owns one socket to `ws://<host>/realtime/<client-id>/<channel>/`
//! and hands every inbound JSON frame to a [`MessageHandler`]. [`Page`] is the
//! bootstrap that subscribes to the `messages` channel and renders chat
//! messages onto a [`MessageBoard`].

pub mod config;
pub mod error;
pub mod handler;
pub mod page;

pub use config::ClientConfig;
pub use error::ClientError;
pub use handler::{MessageHandler, SocketHandler};
pub use page::{MessageBoard, MessageFeed, Page, render_fragment};
