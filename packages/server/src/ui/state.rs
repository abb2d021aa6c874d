//! Server state and connection management.

use serde::Deserialize;
use std::sync::Arc;

use crate::{
    domain::{RoomAdapter, RoomSet},
    infrastructure::repository::InMemoryConnectionRegistry,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    /// Client chosen id; a UUID is generated when absent
    pub client_id: Option<String>,
    /// Comma separated rooms to join on connect, in addition to the defaults
    pub rooms: Option<String>,
}

/// Shared application state
pub struct AppState {
    /// Room adapter（メンバーシップとブロードキャストの抽象化）
    pub adapter: Arc<dyn RoomAdapter>,
    /// Live connections, shared with the adapter for broadcast lookups
    pub registry: Arc<InMemoryConnectionRegistry>,
    /// Rooms every connection joins on connect
    pub default_rooms: RoomSet,
}
