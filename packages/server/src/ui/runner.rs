//! Server bootstrap: state, router and listener.

use std::sync::Arc;

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::{RoomAdapter, RoomSet, ValueObjectError},
    infrastructure::repository::{InMemoryConnectionRegistry, InMemoryRoomAdapter},
};

use super::{
    handler::{
        get_client_rooms, get_room_clients, health_check, list_clients, list_rooms,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid default room configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValueObjectError),

    /// Binding or serving failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wire the registry, the adapter and the shared state together
pub fn create_app_state(default_rooms: RoomSet) -> Arc<AppState> {
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let adapter: Arc<dyn RoomAdapter> = Arc::new(InMemoryRoomAdapter::new(registry.clone()));
    Arc::new(AppState {
        adapter,
        registry,
        default_rooms,
    })
}

/// Build the HTTP / WebSocket router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(list_rooms))
        .route("/api/rooms/{room}/clients", get(get_room_clients))
        .route("/api/clients", get(list_clients))
        .route("/api/clients/{client_id}/rooms", get(get_client_rooms))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind according to `config` and serve until a shutdown signal arrives
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let default_rooms = config.default_room_set()?;
    let listener = TcpListener::bind(config.bind_address()).await?;
    serve(listener, default_rooms).await
}

/// Serve on an already bound listener until a shutdown signal arrives
pub async fn serve(listener: TcpListener, default_rooms: RoomSet) -> Result<(), ServerError> {
    let state = create_app_state(default_rooms);
    let app = create_router(state);

    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
