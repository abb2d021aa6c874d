//! InMemory Room Adapter 実装
//!
//! ドメイン層が定義する RoomAdapter trait の具体的な実装。
//! `MembershipIndex` 全体を一つの `RwLock` で保護します。
//!
//! - join / join_all / leave / leave_all / broadcast: write ロック
//! - clients / client_rooms / rooms: read ロック
//!
//! broadcast は古いメンバーシップを修復する可能性があるため write ロックを取ります。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    BroadcastReport, ConnectionRegistry, MembershipIndex, Payload, RoomAdapter, RoomName, RoomSet,
    SocketId, broadcast::fan_out,
};

/// インメモリ Room Adapter 実装
pub struct InMemoryRoomAdapter {
    /// Membership index, the single lock domain for every operation
    index: RwLock<MembershipIndex>,
    /// Live connections, looked up by id during broadcast
    registry: Arc<dyn ConnectionRegistry>,
}

impl InMemoryRoomAdapter {
    /// 新しい InMemoryRoomAdapter を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            index: RwLock::new(MembershipIndex::new()),
            registry,
        }
    }

    /// Broadcast and return what happened, for callers that need it.
    pub async fn broadcast_with_report(
        &self,
        payload: &Payload,
        rooms: &RoomSet,
        except: Option<&SocketId>,
    ) -> BroadcastReport {
        let mut index = self.index.write().await;
        let report = fan_out(&mut index, self.registry.as_ref(), payload, rooms, except);
        tracing::debug!(
            "Broadcast {} byte(s) to {} room(s): delivered={}, pruned={}",
            payload.as_bytes().len(),
            rooms.len(),
            report.delivered.len(),
            report.pruned.len()
        );
        report
    }

    /// Copy of the current index
    pub async fn snapshot(&self) -> MembershipIndex {
        self.index.read().await.clone()
    }
}

#[async_trait]
impl RoomAdapter for InMemoryRoomAdapter {
    async fn join(&self, socket: &SocketId, room: &RoomName) {
        tracing::debug!("socket={} join to room={}", socket, room);
        self.index.write().await.join(socket, room);
    }

    async fn join_all(&self, socket: &SocketId, rooms: RoomSet) {
        tracing::debug!("socket={} join to {} room(s)", socket, rooms.len());
        self.index.write().await.join_all(socket, &rooms);
    }

    async fn leave(&self, socket: &SocketId, room: &RoomName) {
        tracing::debug!("socket={} leave from room={}", socket, room);
        self.index.write().await.leave(socket, room);
    }

    async fn leave_all(&self, socket: &SocketId) -> Vec<RoomName> {
        let rooms = self.index.write().await.leave_all(socket);
        tracing::debug!("socket={} leave from all {} room(s)", socket, rooms.len());
        rooms
    }

    async fn clients(&self, rooms: RoomSet) -> Vec<SocketId> {
        self.index.read().await.clients(&rooms)
    }

    async fn client_rooms(&self, socket: &SocketId) -> Option<Vec<RoomName>> {
        self.index.read().await.client_rooms(socket)
    }

    async fn rooms(&self) -> Vec<RoomName> {
        self.index.read().await.rooms()
    }

    async fn broadcast(&self, payload: Payload, rooms: RoomSet) {
        self.broadcast_with_report(&payload, &rooms, None).await;
    }

    async fn broadcast_except(&self, payload: Payload, rooms: RoomSet, except: &SocketId) {
        self.broadcast_with_report(&payload, &rooms, Some(except))
            .await;
    }
}
