//! Domain layer for room membership.
//!
//! This module contains the membership index, the broadcast engine and the
//! interfaces the server layer depends on. It knows nothing about WebSocket,
//! HTTP or how connections are stored.

pub mod adapter;
pub mod broadcast;
pub mod entity;
pub mod error;
pub mod factory;
pub mod registry;
pub mod value_object;

pub use adapter::RoomAdapter;
pub use entity::{BroadcastReport, MembershipIndex};
pub use error::{RegistryError, ValueObjectError};
pub use factory::SocketIdFactory;
pub use registry::{ConnectionHandle, ConnectionRegistry};
pub use value_object::{Payload, RoomName, RoomSet, SocketId};
