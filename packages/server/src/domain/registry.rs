//! Connection registry abstraction.
//!
//! The registry owns live connections. The membership index never stores a
//! handle; it resolves socket ids through [`ConnectionRegistry::lookup`] each
//! time it needs to deliver something.

use std::sync::Arc;

use super::{Payload, SocketId};

/// A live connection that can receive payloads.
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionHandle: Send + Sync {
    /// Hand `payload` to the connection. Fire-and-forget: no delivery
    /// confirmation is reported back.
    fn send(&self, payload: Payload);
}

/// Lookup of live connections by socket id.
///
/// Implementations must make `lookup` a cheap, non-blocking point lookup,
/// since it is called while the membership lock is held.
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionRegistry: Send + Sync {
    /// Resolve `socket_id` to its live connection, or `None` when the
    /// connection is gone.
    fn lookup(&self, socket_id: &SocketId) -> Option<Arc<dyn ConnectionHandle>>;
}
