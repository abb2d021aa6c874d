//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
///
/// These are the only failures the domain knows about: malformed input is
/// rejected while building value objects, before any membership state is
/// touched. Unknown sockets or rooms are never errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// SocketId validation error
    #[error("SocketId cannot be empty")]
    SocketIdEmpty,

    /// SocketId too long error
    #[error("SocketId cannot exceed {max} characters (got {actual})")]
    SocketIdTooLong { max: usize, actual: usize },

    /// RoomName validation error
    #[error("RoomName cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("RoomName cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// Payload validation error
    #[error("Payload cannot be empty")]
    PayloadEmpty,

    /// Payload too large error
    #[error("Payload cannot exceed {max} bytes (got {actual})")]
    PayloadTooLarge { max: usize, actual: usize },
}

/// Errors related to the connection registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A live connection is already registered under this id
    #[error("Socket '{0}' is already connected")]
    AlreadyConnected(String),
}
