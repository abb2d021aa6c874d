//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層（RoomAdapter）と Connection Registry を操作します。

pub mod broadcast_message;
pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod join_room;
pub mod leave_room;

pub use broadcast_message::BroadcastMessageUseCase;
pub use connect_client::{ConnectClientUseCase, ConnectedClient};
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, SendMessageError};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
