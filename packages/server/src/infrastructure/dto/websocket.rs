//! WebSocket message DTOs for the host server.
//!
//! These frames only exist to drive the room adapter from a browser or a
//! CLI; they are not a stable protocol.

use serde::{Deserialize, Serialize};

/// Message type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    Connected,
    Joined,
    Left,
    ParticipantJoined,
    ParticipantLeft,
    Chat,
    Error,
}

/// Commands sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientCommand {
    /// Join one room
    Join { room: String },
    /// Leave one room
    Leave { room: String },
    /// Broadcast to the listed rooms, or to every joined room when empty
    Chat {
        #[serde(default)]
        rooms: Vec<String>,
        content: String,
    },
}

/// Sent once right after the connection is accepted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedMessage {
    pub r#type: MessageType,
    pub client_id: String,
    pub rooms: Vec<String>,
    /// Unix timestamp (milliseconds since epoch) in JST
    pub connected_at: i64,
}

/// Acknowledgement of a join or leave command (`joined` / `left`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipMessage {
    pub r#type: MessageType,
    pub room: String,
    /// Rooms the client belongs to after the command
    pub rooms: Vec<String>,
}

/// Notification to room members that someone joined or left
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantMessage {
    pub r#type: MessageType,
    pub client_id: String,
    pub room: String,
    pub timestamp: i64,
}

/// Chat message fanned out to room members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub r#type: MessageType,
    pub client_id: String,
    pub rooms: Vec<String>,
    pub content: String,
    pub timestamp: i64,
}

/// Error reply to a rejected command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub message: String,
}
