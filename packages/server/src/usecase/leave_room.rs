//! UseCase: ルーム退出処理

use std::sync::Arc;

use roomcast_shared::get_jst_timestamp;

use crate::{
    domain::{RoomAdapter, RoomName, SocketId},
    infrastructure::dto::{
        encode_payload,
        websocket::{MessageType, ParticipantMessage},
    },
};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    adapter: Arc<dyn RoomAdapter>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(adapter: Arc<dyn RoomAdapter>) -> Self {
        Self { adapter }
    }

    /// ルーム退出を実行
    ///
    /// 参加していないルームを指定してもエラーにはなりません。
    ///
    /// # Returns
    ///
    /// 退出後に所属しているルームのリスト
    pub async fn execute(&self, client_id: &SocketId, room: &RoomName) -> Vec<RoomName> {
        let was_member = self
            .adapter
            .client_rooms(client_id)
            .await
            .is_some_and(|rooms| rooms.contains(room));

        self.adapter.leave(client_id, room).await;

        if was_member {
            let notice = ParticipantMessage {
                r#type: MessageType::ParticipantLeft,
                client_id: client_id.as_str().to_string(),
                room: room.as_str().to_string(),
                timestamp: get_jst_timestamp(),
            };
            match encode_payload(&notice) {
                Ok(payload) => self.adapter.broadcast(payload, room.into()).await,
                Err(e) => tracing::warn!("Failed to build participant-left notice: {}", e),
            }
        }

        self.adapter
            .client_rooms(client_id)
            .await
            .unwrap_or_default()
    }
}
