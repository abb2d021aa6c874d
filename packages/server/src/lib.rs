//! Room membership and broadcast server library.
//!
//! Tracks which live WebSocket connections belong to which rooms and fans
//! messages out to every member of a room set.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{run as run_server, serve};
