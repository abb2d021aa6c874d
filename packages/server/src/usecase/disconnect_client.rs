//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 全ルームからの退出、Registry からの削除、残りのメンバーへの通知
//!
//! ### なぜこのテストが必要か
//! - 切断後にメンバーシップが残らないことを保証
//! - 最後のメンバーが抜けたルームが削除されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数ルームに所属するクライアントの切断
//! - エッジケース：最後のメンバーの切断
//! - 異常系：存在しないクライアントの切断（エラーにはならない）
//! - 競合：同じ ID で再接続した新しい接続を、古い接続の後片付けが消さない

use std::sync::Arc;

use roomcast_shared::get_jst_timestamp;

use crate::{
    domain::{RoomAdapter, RoomName, SocketId},
    infrastructure::{
        dto::{
            encode_payload,
            websocket::{MessageType, ParticipantMessage},
        },
        repository::{ClientConnection, InMemoryConnectionRegistry},
    },
};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    adapter: Arc<dyn RoomAdapter>,
    registry: Arc<InMemoryConnectionRegistry>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(adapter: Arc<dyn RoomAdapter>, registry: Arc<InMemoryConnectionRegistry>) -> Self {
        Self { adapter, registry }
    }

    /// クライアント切断を実行
    ///
    /// `connection` が `client_id` に現在登録されている接続でない場合
    /// （既に片付け済み、または同じ ID で別の接続が登録済み）は何もしません。
    ///
    /// # Returns
    ///
    /// 切断前に所属していたルームのリスト。未知のクライアントでは空。
    pub async fn execute(
        &self,
        client_id: &SocketId,
        connection: &Arc<ClientConnection>,
    ) -> Vec<RoomName> {
        // 1. この接続が現在の登録であることを確認
        if !self.registry.is_current(client_id, connection) {
            tracing::debug!(
                "Client '{}' is not registered to this connection, skipping cleanup",
                client_id
            );
            return Vec::new();
        }

        // 2. 全ルームから退出（登録が残っている間は同じ ID で再登録されない）
        let rooms = self.adapter.leave_all(client_id).await;

        // 3. Registry から削除
        self.registry.unregister(client_id, connection);

        // 4. 残りのメンバーへ退出を通知
        let disconnected_at = get_jst_timestamp();
        for room in &rooms {
            let notice = ParticipantMessage {
                r#type: MessageType::ParticipantLeft,
                client_id: client_id.as_str().to_string(),
                room: room.as_str().to_string(),
                timestamp: disconnected_at,
            };
            match encode_payload(&notice) {
                Ok(payload) => self.adapter.broadcast(payload, room.into()).await,
                Err(e) => tracing::warn!("Failed to build participant-left notice: {}", e),
            }
        }

        tracing::info!(
            "Client '{}' disconnected from {} room(s)",
            client_id,
            rooms.len()
        );
        rooms
    }
}
