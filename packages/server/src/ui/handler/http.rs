//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use roomcast_shared::timestamp_to_jst_rfc3339;

use crate::{
    domain::{RoomName, SocketId},
    infrastructure::dto::http::{ClientDetailDto, ClientRoomsDto, RoomClientsDto},
    ui::state::AppState,
};

fn names<T: ToString>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List every room with members
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomClientsDto>> {
    let mut rooms = Vec::new();
    for room in state.adapter.rooms().await {
        let clients = state.adapter.clients((&room).into()).await;
        rooms.push(RoomClientsDto {
            room: room.into_string(),
            clients: names(&clients),
        });
    }
    Json(rooms)
}

/// Members of one room. Unknown rooms have no members.
pub async fn get_room_clients(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomClientsDto>, StatusCode> {
    let room = RoomName::try_from(room).map_err(|e| {
        tracing::warn!("Invalid room name: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let clients = state.adapter.clients((&room).into()).await;

    Ok(Json(RoomClientsDto {
        room: room.into_string(),
        clients: names(&clients),
    }))
}

/// Rooms of one client. Unknown clients are 404.
pub async fn get_client_rooms(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<Json<ClientRoomsDto>, StatusCode> {
    let client_id = SocketId::try_from(client_id).map_err(|e| {
        tracing::warn!("Invalid client_id: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let rooms = state
        .adapter
        .client_rooms(&client_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(ClientRoomsDto {
        client_id: client_id.into_string(),
        rooms: names(&rooms),
    }))
}

/// Every connected client with its rooms
pub async fn list_clients(State(state): State<Arc<AppState>>) -> Json<Vec<ClientDetailDto>> {
    let mut clients = Vec::new();
    for client_id in state.registry.socket_ids() {
        let Some(connection) = state.registry.get(&client_id) else {
            continue;
        };
        let rooms = state
            .adapter
            .client_rooms(&client_id)
            .await
            .unwrap_or_default();
        clients.push(ClientDetailDto {
            client_id: client_id.into_string(),
            connected_at: timestamp_to_jst_rfc3339(connection.connected_at()),
            rooms: names(&rooms),
        });
    }
    Json(clients)
}
