//! Room adapter interface exposed to the server layer.

use async_trait::async_trait;

use super::{Payload, RoomName, RoomSet, SocketId};

/// Membership and broadcast operations.
///
/// Every operation is total over arbitrary ids: unknown sockets or rooms give
/// empty results (or `None` from [`RoomAdapter::client_rooms`]), never errors.
/// Methods are async only to give callers a uniform shape; implementations
/// complete as soon as their lock is acquired.
#[async_trait]
pub trait RoomAdapter: Send + Sync {
    /// Add `socket` to `room` (idempotent)
    async fn join(&self, socket: &SocketId, room: &RoomName);

    /// Add `socket` to every room of `rooms` as one atomic step
    async fn join_all(&self, socket: &SocketId, rooms: RoomSet);

    /// Remove `socket` from `room` (idempotent)
    async fn leave(&self, socket: &SocketId, room: &RoomName);

    /// Remove `socket` from every room it belongs to.
    ///
    /// Returns the rooms it was removed from, in join order.
    async fn leave_all(&self, socket: &SocketId) -> Vec<RoomName>;

    /// Deduplicated members of `rooms`, ordered by first appearance
    async fn clients(&self, rooms: RoomSet) -> Vec<SocketId>;

    /// Rooms of `socket`, or `None` when the socket is unknown
    async fn client_rooms(&self, socket: &SocketId) -> Option<Vec<RoomName>>;

    /// All rooms with at least one member
    async fn rooms(&self) -> Vec<RoomName>;

    /// Deliver `payload` once to every live member of `rooms`.
    ///
    /// Members whose connection can no longer be resolved are removed from
    /// the index.
    async fn broadcast(&self, payload: Payload, rooms: RoomSet);

    /// Same as [`RoomAdapter::broadcast`] but never delivers to `except`.
    async fn broadcast_except(&self, payload: Payload, rooms: RoomSet, except: &SocketId);
}
