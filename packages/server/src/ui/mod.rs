//! WebSocket / HTTP host server for the room adapter.

mod handler;
mod runner;
mod signal;
pub mod state; // UseCase 層・テストからアクセスするため public

pub use runner::{ServerError, create_app_state, create_router, run, serve};
