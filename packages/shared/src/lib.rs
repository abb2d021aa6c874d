//! Shared utilities for Roomcast.
//!
//! Logging setup and time helpers used by the server crate.

pub mod logger;
pub mod time;

pub use logger::setup_logger;
pub use time::{get_jst_timestamp, timestamp_to_jst_rfc3339};
