//! InMemory Connection Registry 実装
//!
//! 接続中のクライアントを `DashMap` で管理します。
//! `lookup` はブロードキャスト中（メンバーシップのロック保持中）に呼ばれるため、
//! ロックを待たないポイント参照である必要があります。

use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use tokio::sync::mpsc;

use crate::domain::{ConnectionHandle, ConnectionRegistry, Payload, RegistryError, SocketId};

/// Sender half of a client's outbound channel
pub type PayloadSender = mpsc::UnboundedSender<Payload>;

/// 接続中のクライアント情報
#[derive(Debug)]
pub struct ClientConnection {
    /// Outbound message channel, drained by the WebSocket send task
    sender: PayloadSender,
    /// Unix timestamp when connected (in JST, milliseconds)
    connected_at: i64,
}

impl ClientConnection {
    pub fn new(sender: PayloadSender, connected_at: i64) -> Self {
        Self {
            sender,
            connected_at,
        }
    }

    pub fn connected_at(&self) -> i64 {
        self.connected_at
    }

    /// Whether the receiving side of the channel has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl ConnectionHandle for ClientConnection {
    fn send(&self, payload: Payload) {
        if self.sender.send(payload).is_err() {
            tracing::warn!("Dropped payload for a closed connection");
        }
    }
}

/// インメモリ Connection Registry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    connections: DashMap<SocketId, Arc<ClientConnection>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live connection and return the shared handle.
    ///
    /// The returned `Arc` identifies this connection; pass it back to
    /// [`Self::unregister`] so that cleanup only ever removes its own entry.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::AlreadyConnected` while `socket_id` has an
    /// entry, even one whose channel is closed. The id becomes free once the
    /// previous connection has been unregistered.
    pub fn register(
        &self,
        socket_id: SocketId,
        connection: ClientConnection,
    ) -> Result<Arc<ClientConnection>, RegistryError> {
        match self.connections.entry(socket_id) {
            Entry::Occupied(entry) => Err(RegistryError::AlreadyConnected(
                entry.key().as_str().to_string(),
            )),
            Entry::Vacant(entry) => {
                let connection = Arc::new(connection);
                entry.insert(Arc::clone(&connection));
                Ok(connection)
            }
        }
    }

    /// Whether `connection` is the entry currently registered for `socket_id`
    pub fn is_current(&self, socket_id: &SocketId, connection: &Arc<ClientConnection>) -> bool {
        self.connections
            .get(socket_id)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), connection))
    }

    /// Remove `connection` from the registry.
    ///
    /// Nothing happens when `socket_id` is registered to a different
    /// connection. Returns `true` when the entry was removed.
    pub fn unregister(&self, socket_id: &SocketId, connection: &Arc<ClientConnection>) -> bool {
        self.connections
            .remove_if(socket_id, |_, current| Arc::ptr_eq(current, connection))
            .is_some()
    }

    pub fn get(&self, socket_id: &SocketId) -> Option<Arc<ClientConnection>> {
        self.connections
            .get(socket_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, socket_id: &SocketId) -> bool {
        self.connections.contains_key(socket_id)
    }

    #[cfg(test)]
    pub(crate) fn count(&self) -> usize {
        self.connections.len()
    }

    /// Ids of every registered connection, sorted
    pub fn socket_ids(&self) -> Vec<SocketId> {
        let mut ids: Vec<SocketId> = self
            .connections
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }
}

impl ConnectionRegistry for InMemoryConnectionRegistry {
    fn lookup(&self, socket_id: &SocketId) -> Option<Arc<dyn ConnectionHandle>> {
        let connection = self.get(socket_id)?;
        if connection.is_closed() {
            return None;
        }
        Some(connection as Arc<dyn ConnectionHandle>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn socket(id: &str) -> SocketId {
        SocketId::try_from(id).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        // テスト項目: 登録した接続を lookup で取得でき、send が届く
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = registry.register(socket("alice"), ClientConnection::new(tx, 42));

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get(&socket("alice")).unwrap().connected_at(), 42);

        let handle = registry.lookup(&socket("alice")).unwrap();
        handle.send(Payload::from_text("hello".to_string()).unwrap());
        assert_eq!(rx.try_recv().unwrap().as_text(), Some("hello"));
    }

    #[test]
    fn test_register_duplicate_is_rejected() {
        // テスト項目: 接続中の ID で再登録するとエラーになる
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        registry
            .register(socket("alice"), ClientConnection::new(tx1, 1))
            .unwrap();

        // when (操作):
        let result = registry.register(socket("alice"), ClientConnection::new(tx2, 2));

        // then (期待する結果):
        assert_eq!(
            result.err(),
            Some(RegistryError::AlreadyConnected("alice".to_string()))
        );
        assert_eq!(registry.get(&socket("alice")).unwrap().connected_at(), 1);
    }

    #[test]
    fn test_register_rejects_closed_connection_until_unregistered() {
        // テスト項目: 受信側が閉じていても、unregister されるまで同じ ID は登録できない
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (tx1, rx1) = mpsc::unbounded_channel();
        let old = registry
            .register(socket("alice"), ClientConnection::new(tx1, 1))
            .unwrap();
        drop(rx1);

        // when (操作):
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let rejected = registry.register(socket("alice"), ClientConnection::new(tx2, 2));

        // then (期待する結果):
        assert_eq!(
            rejected.err(),
            Some(RegistryError::AlreadyConnected("alice".to_string()))
        );

        // when (操作): 古い接続を削除してから再登録
        assert!(registry.unregister(&socket("alice"), &old));
        let (tx3, _rx3) = mpsc::unbounded_channel();
        let new = registry
            .register(socket("alice"), ClientConnection::new(tx3, 3))
            .unwrap();

        // then (期待する結果):
        assert!(registry.is_current(&socket("alice"), &new));
        assert!(!registry.is_current(&socket("alice"), &old));
        assert_eq!(registry.get(&socket("alice")).unwrap().connected_at(), 3);
    }

    #[test]
    fn test_unregister_ignores_other_connection() {
        // テスト項目: 別の接続の Arc では現在の登録は削除されない
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (tx_old, _rx_old) = mpsc::unbounded_channel();
        let old = registry
            .register(socket("alice"), ClientConnection::new(tx_old, 1))
            .unwrap();
        assert!(registry.unregister(&socket("alice"), &old));
        let (tx_new, _rx_new) = mpsc::unbounded_channel();
        let new = registry
            .register(socket("alice"), ClientConnection::new(tx_new, 2))
            .unwrap();

        // when (操作): 古い接続で再度 unregister
        let removed = registry.unregister(&socket("alice"), &old);

        // then (期待する結果):
        assert!(!removed);
        assert!(registry.is_current(&socket("alice"), &new));
        assert!(registry.lookup(&socket("alice")).is_some());
    }

    #[test]
    fn test_lookup_closed_or_missing_is_none() {
        // テスト項目: 未登録・切断済みの接続は lookup で None になる
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let (tx, rx) = mpsc::unbounded_channel();
        registry
            .register(socket("bob"), ClientConnection::new(tx, 1))
            .unwrap();
        drop(rx);

        // then (期待する結果):
        assert!(registry.lookup(&socket("bob")).is_none());
        assert!(registry.lookup(&socket("ghost")).is_none());
    }

    #[test]
    fn test_unregister() {
        // テスト項目: unregister で接続が削除される
        let registry = InMemoryConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let carol = registry
            .register(socket("carol"), ClientConnection::new(tx, 1))
            .unwrap();

        assert!(registry.unregister(&socket("carol"), &carol));
        assert!(!registry.unregister(&socket("carol"), &carol));
        assert!(!registry.contains(&socket("carol")));
        assert!(registry.socket_ids().is_empty());
    }
}
