//! Factories for generating value objects.

use super::ClientId;

/// Factory for generating ClientId instances.
///
/// Keeps the generation concern apart from the validation logic in ClientId.
pub struct ClientIdFactory;

impl ClientIdFactory {
    /// Generate a new ClientId from a random UUID v4.
    ///
    /// The id is the 32-character lowercase hex ("simple") form of the UUID,
    /// which is always a valid URL path segment.
    pub fn generate() -> ClientId {
        ClientId::from_uuid(uuid::Uuid::new_v4())
    }
}
