//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::{
    domain::{Payload, RoomName, RoomSet, SocketId, SocketIdFactory},
    infrastructure::{
        dto::{
            encode_payload,
            websocket::{
                ClientCommand, ConnectedMessage, ErrorMessage, MembershipMessage, MessageType,
            },
        },
        repository::inmemory::connection::PayloadSender,
    },
    ui::state::{AppState, ConnectQuery},
    usecase::{
        BroadcastMessageUseCase, ConnectClientUseCase, ConnectError, ConnectedClient,
        DisconnectClientUseCase, JoinRoomUseCase, LeaveRoomUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> SocketId (Domain Model), or generate one
    let client_id = match query.client_id {
        Some(id) => SocketId::try_from(id.clone()).map_err(|_| {
            tracing::warn!("Invalid client_id format: '{}'", id);
            StatusCode::BAD_REQUEST
        })?,
        None => SocketIdFactory::generate().map_err(|e| {
            tracing::error!("Failed to generate client_id: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?,
    };

    let requested = match query.rooms.as_deref() {
        Some(list) => RoomSet::parse_list(list).map_err(|e| {
            tracing::warn!("Invalid rooms '{}': {}", list, e);
            StatusCode::BAD_REQUEST
        })?,
        None => RoomSet::default(),
    };
    let rooms: RoomSet = state
        .default_rooms
        .iter()
        .chain(requested.iter())
        .cloned()
        .collect();

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    let connect_usecase = ConnectClientUseCase::new(state.adapter.clone(), state.registry.clone());

    match connect_usecase.execute(client_id, tx.clone(), rooms).await {
        Ok(connected) => {
            tracing::info!("Client '{}' connected and registered", connected.client_id);
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connected, tx, rx)))
        }
        Err(ConnectError::DuplicateClientId(id)) => {
            tracing::warn!(
                "Client with ID '{}' is already connected. Rejecting connection.",
                id
            );
            Err(StatusCode::CONFLICT)
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connected: ConnectedClient,
    reply: PayloadSender,
    mut rx: mpsc::UnboundedReceiver<Payload>,
) {
    let (mut sender, mut receiver) = socket.split();
    let client_id = connected.client_id.clone();

    // Tell the client who it is and where it is
    let connected_msg = ConnectedMessage {
        r#type: MessageType::Connected,
        client_id: client_id.as_str().to_string(),
        rooms: connected.rooms.iter().map(ToString::to_string).collect(),
        connected_at: connected.connected_at,
    };
    match encode_payload(&connected_msg) {
        Ok(payload) => {
            if let Err(e) = sender.send(to_ws_message(&payload)).await {
                tracing::error!("Failed to send connected message to '{}': {}", client_id, e);
                DisconnectClientUseCase::new(state.adapter.clone(), state.registry.clone())
                    .execute(&client_id, &connected.connection)
                    .await;
                return;
            }
        }
        Err(e) => tracing::error!("Failed to encode connected message: {}", e),
    }

    let client_id_clone = client_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive commands from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text from '{}': {}", client_id_clone, text.as_str());

                    // If not a JSON command, treat as plain text chat to every joined room
                    let command = serde_json::from_str::<ClientCommand>(text.as_str()).unwrap_or_else(|e| {
                        tracing::debug!("Not a JSON command ({}), treating as chat", e);
                        ClientCommand::Chat {
                            rooms: Vec::new(),
                            content: text.as_str().to_string(),
                        }
                    });

                    handle_command(&state_clone, &client_id_clone, &reply, command).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward broadcasts to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(to_ws_message(&payload)).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let disconnect_usecase = DisconnectClientUseCase::new(state.adapter.clone(), state.registry.clone());
    let rooms = disconnect_usecase
        .execute(&client_id, &connected.connection)
        .await;
    tracing::info!(
        "Client '{}' disconnected and removed from {} room(s)",
        client_id,
        rooms.len()
    );
}

async fn handle_command(
    state: &AppState,
    client_id: &SocketId,
    reply: &PayloadSender,
    command: ClientCommand,
) {
    match command {
        ClientCommand::Join { room } => match RoomName::try_from(room) {
            Ok(room) => {
                let rooms = JoinRoomUseCase::new(state.adapter.clone())
                    .execute(client_id, &room)
                    .await;
                send_reply(reply, &membership_message(MessageType::Joined, room, rooms));
            }
            Err(e) => send_error(reply, e.to_string()),
        },
        ClientCommand::Leave { room } => match RoomName::try_from(room) {
            Ok(room) => {
                let rooms = LeaveRoomUseCase::new(state.adapter.clone())
                    .execute(client_id, &room)
                    .await;
                send_reply(reply, &membership_message(MessageType::Left, room, rooms));
            }
            Err(e) => send_error(reply, e.to_string()),
        },
        ClientCommand::Chat { rooms, content } => {
            let rooms = match rooms
                .into_iter()
                .map(RoomName::try_from)
                .collect::<Result<RoomSet, _>>()
            {
                Ok(rooms) => rooms,
                Err(e) => return send_error(reply, e.to_string()),
            };

            let send_usecase = BroadcastMessageUseCase::new(state.adapter.clone());
            match send_usecase.execute(client_id, rooms, content).await {
                Ok(targets) => {
                    tracing::debug!(
                        "Broadcasted message from '{}' to {} room(s)",
                        client_id,
                        targets.len()
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to send message from '{}': {}", client_id, e);
                    send_error(reply, e.to_string());
                }
            }
        }
    }
}

fn membership_message(r#type: MessageType, room: RoomName, rooms: Vec<RoomName>) -> MembershipMessage {
    MembershipMessage {
        r#type,
        room: room.into_string(),
        rooms: rooms.into_iter().map(RoomName::into_string).collect(),
    }
}

fn send_error(reply: &PayloadSender, message: String) {
    send_reply(
        reply,
        &ErrorMessage {
            r#type: MessageType::Error,
            message,
        },
    );
}

fn send_reply<T: Serialize>(reply: &PayloadSender, message: &T) {
    match encode_payload(message) {
        Ok(payload) => {
            if reply.send(payload).is_err() {
                tracing::warn!("Failed to queue reply: connection closed");
            }
        }
        Err(e) => tracing::error!("Failed to encode reply: {}", e),
    }
}

fn to_ws_message(payload: &Payload) -> Message {
    match payload.as_text() {
        Some(text) => Message::Text(text.to_string().into()),
        None => Message::Binary(Bytes::copy_from_slice(payload.as_bytes())),
    }
}
