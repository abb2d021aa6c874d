//! Data transfer objects for HTTP and WebSocket.

pub mod http;
pub mod websocket;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Payload, ValueObjectError};

/// Errors while turning a DTO into a broadcast payload
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Failed to serialize message: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Payload(#[from] ValueObjectError),
}

/// Serialize `message` as a JSON text payload
pub fn encode_payload<T: Serialize>(message: &T) -> Result<Payload, EncodeError> {
    let json = serde_json::to_string(message)?;
    Ok(Payload::from_text(json)?)
}
