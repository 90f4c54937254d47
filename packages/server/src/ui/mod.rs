//! UI layer: HTTP and WebSocket endpoints, router and server lifecycle.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{build_router, run, serve};
