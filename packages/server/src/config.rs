//! Server configuration.
//!
//! Command line flags with environment variable fallbacks.

use clap::Parser;

use crate::domain::{RoomSet, ValueObjectError};

/// Roomcast server
#[derive(Parser, Debug, Clone)]
#[command(name = "roomcast-server", version, about = "Room membership and broadcast server")]
pub struct ServerConfig {
    /// Bind address
    #[arg(long, env = "ROOMCAST_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "ROOMCAST_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "ROOMCAST_LOG_LEVEL", default_value = "debug")]
    pub log_level: String,

    /// Rooms every connection joins on connect
    #[arg(
        long = "default-room",
        env = "ROOMCAST_DEFAULT_ROOMS",
        value_delimiter = ',',
        default_value = "lobby"
    )]
    pub default_rooms: Vec<String>,
}

impl ServerConfig {
    /// Socket address to bind, as `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validated default rooms
    pub fn default_room_set(&self) -> Result<RoomSet, ValueObjectError> {
        RoomSet::parse_list(&self.default_rooms.join(","))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "debug".to_string(),
            default_rooms: vec!["lobby".to_string()],
        }
    }
}
