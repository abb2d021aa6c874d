//! Infrastructure layer: in-memory implementations and wire DTOs.

pub mod dto;
pub mod repository;
