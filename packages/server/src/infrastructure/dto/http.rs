//! HTTP API response DTOs for the host server.

use serde::{Deserialize, Serialize};

/// Room and its current members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomClientsDto {
    pub room: String,
    pub clients: Vec<String>,
}

/// Rooms a client belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRoomsDto {
    pub client_id: String,
    pub rooms: Vec<String>,
}

/// Connected client detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDetailDto {
    pub client_id: String,
    pub connected_at: String, // ISO 8601
    pub rooms: Vec<String>,
}
