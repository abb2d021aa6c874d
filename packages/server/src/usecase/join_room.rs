//! UseCase: ルーム参加処理

use std::sync::Arc;

use roomcast_shared::get_jst_timestamp;

use crate::{
    domain::{RoomAdapter, RoomName, SocketId},
    infrastructure::dto::{
        encode_payload,
        websocket::{MessageType, ParticipantMessage},
    },
};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    adapter: Arc<dyn RoomAdapter>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(adapter: Arc<dyn RoomAdapter>) -> Self {
        Self { adapter }
    }

    /// ルーム参加を実行
    ///
    /// 既に参加済みの場合は何もせず、通知も送りません。
    ///
    /// # Returns
    ///
    /// 参加後に所属しているルームのリスト
    pub async fn execute(&self, client_id: &SocketId, room: &RoomName) -> Vec<RoomName> {
        let already_member = self
            .adapter
            .client_rooms(client_id)
            .await
            .is_some_and(|rooms| rooms.contains(room));

        if !already_member {
            self.adapter.join(client_id, room).await;

            let notice = ParticipantMessage {
                r#type: MessageType::ParticipantJoined,
                client_id: client_id.as_str().to_string(),
                room: room.as_str().to_string(),
                timestamp: get_jst_timestamp(),
            };
            match encode_payload(&notice) {
                Ok(payload) => {
                    self.adapter
                        .broadcast_except(payload, room.into(), client_id)
                        .await
                }
                Err(e) => tracing::warn!("Failed to build participant-joined notice: {}", e),
            }
        }

        self.adapter
            .client_rooms(client_id)
            .await
            .unwrap_or_default()
    }
}
