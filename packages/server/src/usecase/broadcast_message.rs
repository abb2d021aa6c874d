//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastMessageUseCase::execute() メソッド
//! - 送信先ルームの決定とブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者が参加していないルームへは送れないことを保証
//! - 複数ルームに所属するメンバーに重複して届かないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：指定ルームへの送信、全所属ルームへの送信
//! - 異常系：未参加ルームの指定、所属ルームなし、空メッセージ

use std::sync::Arc;

use roomcast_shared::get_jst_timestamp;

use crate::{
    domain::{Payload, RoomAdapter, RoomName, RoomSet, SocketId, ValueObjectError},
    infrastructure::dto::{
        EncodeError, encode_payload,
        websocket::{ChatMessage, MessageType},
    },
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct BroadcastMessageUseCase {
    adapter: Arc<dyn RoomAdapter>,
}

impl BroadcastMessageUseCase {
    /// 新しい BroadcastMessageUseCase を作成
    pub fn new(adapter: Arc<dyn RoomAdapter>) -> Self {
        Self { adapter }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信者のクライアント ID
    /// * `rooms` - 送信先ルーム。空の場合は送信者の全所属ルーム
    /// * `content` - メッセージ内容
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RoomName>)` - 実際に送信したルーム
    /// * `Err(SendMessageError)` - 送信失敗（何も送信されていない）
    pub async fn execute(
        &self,
        from: &SocketId,
        rooms: RoomSet,
        content: String,
    ) -> Result<Vec<RoomName>, SendMessageError> {
        if content.is_empty() {
            return Err(SendMessageError::InvalidPayload(
                ValueObjectError::PayloadEmpty,
            ));
        }

        // 1. 送信先ルームを決定
        let joined = self.adapter.client_rooms(from).await.unwrap_or_default();
        let targets = self.resolve_targets(&joined, rooms)?;

        // 2. ペイロードを構築
        let message = ChatMessage {
            r#type: MessageType::Chat,
            client_id: from.as_str().to_string(),
            rooms: targets.iter().map(|r| r.as_str().to_string()).collect(),
            content,
            timestamp: get_jst_timestamp(),
        };
        let payload = build_payload(&message)?;

        // 3. 送信者以外へブロードキャスト
        self.adapter
            .broadcast_except(payload, targets.clone().into(), from)
            .await;

        Ok(targets)
    }

    /// 送信先ルームを検証
    ///
    /// 空の指定は全所属ルームを意味します。
    fn resolve_targets(
        &self,
        joined: &[RoomName],
        requested: RoomSet,
    ) -> Result<Vec<RoomName>, SendMessageError> {
        let targets = if requested.is_empty() {
            joined.to_vec()
        } else {
            let mut targets: Vec<RoomName> = Vec::with_capacity(requested.len());
            for room in requested.into_vec() {
                if !joined.contains(&room) {
                    return Err(SendMessageError::NotInRoom(room.into_string()));
                }
                if !targets.contains(&room) {
                    targets.push(room);
                }
            }
            targets
        };

        if targets.is_empty() {
            return Err(SendMessageError::NoTargetRooms);
        }
        Ok(targets)
    }
}

fn build_payload(message: &ChatMessage) -> Result<Payload, SendMessageError> {
    encode_payload(message).map_err(|e| match e {
        EncodeError::Payload(e) => SendMessageError::InvalidPayload(e),
        EncodeError::Json(e) => SendMessageError::Encode(e.to_string()),
    })
}
