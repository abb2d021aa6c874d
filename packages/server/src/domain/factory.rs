//! Domain factories for creating domain entities and value objects.

use super::{SocketId, error::ValueObjectError};

/// Factory for generating SocketId instances.
///
/// Used when a client connects without choosing its own identifier.
pub struct SocketIdFactory;

impl SocketIdFactory {
    /// Generate a new SocketId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<SocketId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        SocketId::new(uuid.hyphenated().to_string())
    }
}
