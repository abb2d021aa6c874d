//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{get_client_rooms, get_room_clients, health_check, list_clients, list_rooms};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
