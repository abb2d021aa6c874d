//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - 接続の登録と初期ルームへの参加
//!
//! ### なぜこのテストが必要か
//! - 重複接続を防ぐ
//! - 初期ルームへの参加が一度の操作で行われ、既存メンバーに通知されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規クライアントの接続
//! - 異常系：重複した client_id での接続試行
//! - エッジケース：初期ルームなしでの接続

use std::sync::Arc;

use roomcast_shared::get_jst_timestamp;

use crate::{
    domain::{RoomAdapter, RoomName, RoomSet, SocketId},
    infrastructure::{
        dto::{
            encode_payload,
            websocket::{MessageType, ParticipantMessage},
        },
        repository::inmemory::{ClientConnection, InMemoryConnectionRegistry, connection::PayloadSender},
    },
};

use super::error::ConnectError;

/// 接続が完了したクライアントの情報
#[derive(Debug, Clone)]
pub struct ConnectedClient {
    pub client_id: SocketId,
    /// Registry に登録された接続。切断時にこの接続だけを削除するために使う
    pub connection: Arc<ClientConnection>,
    /// 接続直後に所属しているルーム（参加順）
    pub rooms: Vec<RoomName>,
    pub connected_at: i64,
}

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    adapter: Arc<dyn RoomAdapter>,
    registry: Arc<InMemoryConnectionRegistry>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(adapter: Arc<dyn RoomAdapter>, registry: Arc<InMemoryConnectionRegistry>) -> Self {
        Self { adapter, registry }
    }

    /// クライアント接続を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 接続するクライアントの ID
    /// * `sender` - メッセージ送信チャンネル
    /// * `rooms` - 接続と同時に参加するルーム
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectedClient)` - 接続成功
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(
        &self,
        client_id: SocketId,
        sender: PayloadSender,
        rooms: RoomSet,
    ) -> Result<ConnectedClient, ConnectError> {
        let connected_at = get_jst_timestamp();

        // 1. Connection Registry に登録（重複チェックを含む）
        let connection = self
            .registry
            .register(client_id.clone(), ClientConnection::new(sender, connected_at))
            .map_err(|_| ConnectError::DuplicateClientId(client_id.as_str().to_string()))?;

        // 2. 初期ルームへ一括で参加
        self.adapter.join_all(&client_id, rooms).await;
        let rooms = self
            .adapter
            .client_rooms(&client_id)
            .await
            .unwrap_or_default();

        // 3. 既存メンバーへ参加を通知
        for room in &rooms {
            let notice = ParticipantMessage {
                r#type: MessageType::ParticipantJoined,
                client_id: client_id.as_str().to_string(),
                room: room.as_str().to_string(),
                timestamp: connected_at,
            };
            match encode_payload(&notice) {
                Ok(payload) => {
                    self.adapter
                        .broadcast_except(payload, room.into(), &client_id)
                        .await;
                }
                Err(e) => tracing::warn!("Failed to build participant-joined notice: {}", e),
            }
        }

        tracing::info!("Client '{}' connected to {} room(s)", client_id, rooms.len());

        Ok(ConnectedClient {
            client_id,
            connection,
            rooms,
            connected_at,
        })
    }
}
