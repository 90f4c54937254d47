//! Client error definitions.

use thiserror::Error;

/// Errors returned by [`crate::SocketHandler::send`].
///
/// Socket-level failures are not reported here; they only reach the
/// handler's `on_close`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The payload is not a JSON object or array
    #[error("bad message: expected a JSON object or array, got {0}")]
    InvalidPayload(&'static str),

    /// The payload could not be serialized
    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The socket has already closed
    #[error("connection is closed")]
    Closed,
}
