//! Core domain models for room membership.

use indexmap::{IndexMap, IndexSet};

use super::value_object::{RoomName, RoomSet, SocketId};

/// Bidirectional relation between sockets and rooms.
///
/// Two tables are kept in lockstep:
///
/// - `sockets_to_rooms`: socket -> rooms it belongs to
/// - `rooms_to_sockets`: room -> sockets that belong to it
///
/// After every method returns, `s` is in `rooms_to_sockets[r]` exactly when
/// `r` is in `sockets_to_rooms[s]`, and neither table holds an empty set.
/// Both tables preserve insertion order, so query results follow join order.
///
/// The tables are private: callers can only change them through the methods
/// below, which always update both sides.
#[derive(Debug, Clone, Default)]
pub struct MembershipIndex {
    sockets_to_rooms: IndexMap<SocketId, IndexSet<RoomName>>,
    rooms_to_sockets: IndexMap<RoomName, IndexSet<SocketId>>,
}

impl MembershipIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `socket` to `room`. Repeated joins are no-ops.
    ///
    /// Returns `true` when the membership was newly created.
    pub fn join(&mut self, socket: &SocketId, room: &RoomName) -> bool {
        let inserted = self
            .sockets_to_rooms
            .entry(socket.clone())
            .or_default()
            .insert(room.clone());
        self.rooms_to_sockets
            .entry(room.clone())
            .or_default()
            .insert(socket.clone());
        inserted
    }

    /// Add `socket` to every room of `rooms`, in order.
    ///
    /// Returns the number of memberships newly created.
    pub fn join_all(&mut self, socket: &SocketId, rooms: &RoomSet) -> usize {
        let mut added = 0;
        for room in rooms {
            if self.join(socket, room) {
                added += 1;
            }
        }
        added
    }

    /// Remove `socket` from `room`.
    ///
    /// Unknown sockets and rooms are tolerated. Sets that become empty are
    /// pruned on both sides. Returns `true` when a membership was removed.
    pub fn leave(&mut self, socket: &SocketId, room: &RoomName) -> bool {
        let removed = match self.sockets_to_rooms.get_mut(socket) {
            Some(rooms) => {
                let removed = rooms.shift_remove(room);
                if rooms.is_empty() {
                    self.sockets_to_rooms.shift_remove(socket);
                }
                removed
            }
            None => false,
        };
        self.remove_from_room(socket, room);
        removed
    }

    /// Remove `socket` from every room it belongs to.
    ///
    /// Returns the rooms the socket was removed from, in join order. An
    /// unknown socket yields an empty list.
    pub fn leave_all(&mut self, socket: &SocketId) -> Vec<RoomName> {
        let Some(rooms) = self.sockets_to_rooms.shift_remove(socket) else {
            return Vec::new();
        };
        for room in &rooms {
            self.remove_from_room(socket, room);
        }
        rooms.into_iter().collect()
    }

    /// Deduplicated members of `rooms`.
    ///
    /// Sockets are ordered by first appearance, walking rooms in the given
    /// order and each room's members in join order. Unknown rooms contribute
    /// nothing.
    pub fn clients(&self, rooms: &RoomSet) -> Vec<SocketId> {
        let mut seen: IndexSet<&SocketId> = IndexSet::new();
        for room in rooms {
            if let Some(members) = self.rooms_to_sockets.get(room) {
                seen.extend(members.iter());
            }
        }
        seen.into_iter().cloned().collect()
    }

    /// Rooms `socket` belongs to, in join order.
    ///
    /// `None` means the socket is unknown to the index, which is distinct
    /// from belonging to no rooms (a state the index never persists).
    pub fn client_rooms(&self, socket: &SocketId) -> Option<Vec<RoomName>> {
        self.sockets_to_rooms
            .get(socket)
            .map(|rooms| rooms.iter().cloned().collect())
    }

    /// All rooms that currently have members, in creation order.
    pub fn rooms(&self) -> Vec<RoomName> {
        self.rooms_to_sockets.keys().cloned().collect()
    }

    /// All sockets that currently belong to a room, in first-join order.
    pub fn sockets(&self) -> Vec<SocketId> {
        self.sockets_to_rooms.keys().cloned().collect()
    }

    /// Whether `socket` is a member of `room`
    #[cfg(test)]
    pub(crate) fn contains(&self, socket: &SocketId, room: &RoomName) -> bool {
        self.rooms_to_sockets
            .get(room)
            .is_some_and(|members| members.contains(socket))
    }

    /// Number of distinct rooms with members
    #[cfg(test)]
    pub(crate) fn room_count(&self) -> usize {
        self.rooms_to_sockets.len()
    }

    /// Number of distinct sockets with memberships
    #[cfg(test)]
    pub(crate) fn socket_count(&self) -> usize {
        self.sockets_to_rooms.len()
    }

    /// Whether the index holds no memberships at all
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.sockets_to_rooms.is_empty() && self.rooms_to_sockets.is_empty()
    }

    // Prunes the room entry exactly when it exists and lists the socket.
    fn remove_from_room(&mut self, socket: &SocketId, room: &RoomName) {
        if let Some(members) = self.rooms_to_sockets.get_mut(room)
            && members.shift_remove(socket)
            && members.is_empty()
        {
            self.rooms_to_sockets.shift_remove(room);
        }
    }

    /// Panics if the two tables disagree or hold an empty set.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for (socket, rooms) in &self.sockets_to_rooms {
            assert!(!rooms.is_empty(), "empty room set persisted for {socket}");
            for room in rooms {
                assert!(
                    self.rooms_to_sockets
                        .get(room)
                        .is_some_and(|members| members.contains(socket)),
                    "{socket} lists {room} but {room} does not list {socket}"
                );
            }
        }
        for (room, members) in &self.rooms_to_sockets {
            assert!(!members.is_empty(), "empty member set persisted for {room}");
            for socket in members {
                assert!(
                    self.sockets_to_rooms
                        .get(socket)
                        .is_some_and(|rooms| rooms.contains(room)),
                    "{room} lists {socket} but {socket} does not list {room}"
                );
            }
        }
    }
}

/// Outcome of one broadcast pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Sockets the payload was handed to, in delivery order
    pub delivered: Vec<SocketId>,
    /// Stale sockets removed from the index during the pass
    pub pruned: Vec<SocketId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn socket(id: &str) -> SocketId {
        SocketId::try_from(id).unwrap()
    }

    fn room(name: &str) -> RoomName {
        RoomName::try_from(name).unwrap()
    }

    fn rooms(names: &[&str]) -> RoomSet {
        names.iter().map(|name| room(name)).collect()
    }

    #[test]
    fn test_join_creates_both_sides() {
        // テスト項目: join で双方向の関係が作成される
        // given (前提条件):
        let mut index = MembershipIndex::new();

        // when (操作):
        let inserted = index.join(&socket("s1"), &room("A"));

        // then (期待する結果):
        assert!(inserted);
        assert!(index.contains(&socket("s1"), &room("A")));
        assert_eq!(index.client_rooms(&socket("s1")), Some(vec![room("A")]));
        assert_eq!(index.clients(&rooms(&["A"])), vec![socket("s1")]);
        index.assert_consistent();
    }

    #[test]
    fn test_join_is_idempotent() {
        // テスト項目: 同じ (socket, room) への join を繰り返しても状態は変わらない
        // given (前提条件):
        let mut index = MembershipIndex::new();
        index.join(&socket("s1"), &room("A"));

        // when (操作):
        let inserted = index.join(&socket("s1"), &room("A"));

        // then (期待する結果):
        assert!(!inserted);
        assert_eq!(index.clients(&rooms(&["A"])), vec![socket("s1")]);
        assert_eq!(index.client_rooms(&socket("s1")), Some(vec![room("A")]));
        index.assert_consistent();
    }

    #[test]
    fn test_join_then_leave_restores_empty_index() {
        // テスト項目: join → leave で join 前の状態に戻る
        // given (前提条件):
        let mut index = MembershipIndex::new();
        index.join(&socket("s1"), &room("A"));

        // when (操作):
        let removed = index.leave(&socket("s1"), &room("A"));

        // then (期待する結果): 空の集合は両側とも残らない
        assert!(removed);
        assert!(index.is_empty());
        assert_eq!(index.client_rooms(&socket("s1")), None);
        assert!(index.rooms().is_empty());
        index.assert_consistent();
    }

    #[test]
    fn test_join_then_leave_keeps_other_memberships() {
        // テスト項目: join → leave は他のメンバーシップに影響しない
        // given (前提条件):
        let mut index = MembershipIndex::new();
        index.join(&socket("s1"), &room("A"));
        index.join(&socket("s2"), &room("A"));
        index.join(&socket("s1"), &room("B"));
        let before_rooms = index.rooms();
        let before_sockets = index.sockets();

        // when (操作):
        index.join(&socket("s2"), &room("C"));
        index.leave(&socket("s2"), &room("C"));

        // then (期待する結果):
        assert_eq!(index.rooms(), before_rooms);
        assert_eq!(index.sockets(), before_sockets);
        index.assert_consistent();
    }

    #[test]
    fn test_leave_unknown_socket_or_room_is_noop() {
        // テスト項目: 存在しない socket / room の leave はエラーにならず何も変えない
        // given (前提条件):
        let mut index = MembershipIndex::new();
        index.join(&socket("s1"), &room("A"));

        // when (操作):
        let unknown_socket = index.leave(&socket("ghost"), &room("A"));
        let unknown_room = index.leave(&socket("s1"), &room("nowhere"));

        // then (期待する結果):
        assert!(!unknown_socket);
        assert!(!unknown_room);
        assert_eq!(index.clients(&rooms(&["A"])), vec![socket("s1")]);
        assert_eq!(index.room_count(), 1);
        index.assert_consistent();
    }

    #[test]
    fn test_join_all_then_client_rooms() {
        // テスト項目: join_all 後の client_rooms が参加した全ルームを返す
        // given (前提条件):
        let mut forward = MembershipIndex::new();
        let mut backward = MembershipIndex::new();

        // when (操作):
        let added = forward.join_all(&socket("s"), &rooms(&["r1", "r2"]));
        backward.join_all(&socket("s"), &rooms(&["r2", "r1"]));

        // then (期待する結果): 順序に関わらず {r1, r2}
        assert_eq!(added, 2);
        let mut a = forward.client_rooms(&socket("s")).unwrap();
        let mut b = backward.client_rooms(&socket("s")).unwrap();
        a.sort();
        b.sort();
        assert_eq!(a, vec![room("r1"), room("r2")]);
        assert_eq!(a, b);
        forward.assert_consistent();
        backward.assert_consistent();
    }

    #[test]
    fn test_join_all_with_duplicate_rooms() {
        // テスト項目: join_all に重複したルームを渡しても一度だけ参加する
        let mut index = MembershipIndex::new();
        let added = index.join_all(&socket("s"), &rooms(&["A", "A", "B"]));
        assert_eq!(added, 2);
        assert_eq!(
            index.client_rooms(&socket("s")),
            Some(vec![room("A"), room("B")])
        );
        index.assert_consistent();
    }

    #[test]
    fn test_clients_deduplicates_across_rooms() {
        // テスト項目: 複数ルームに所属する socket は clients で一度だけ返される
        // given (前提条件):
        let mut index = MembershipIndex::new();
        index.join(&socket("a"), &room("r1"));
        index.join(&socket("a"), &room("r2"));

        // when (操作):
        let clients = index.clients(&rooms(&["r1", "r2"]));

        // then (期待する結果):
        assert_eq!(clients, vec![socket("a")]);
    }

    #[test]
    fn test_clients_orders_by_first_appearance() {
        // テスト項目: clients はルームの指定順 → 参加順で最初に現れた順に並ぶ
        // given (前提条件):
        let mut index = MembershipIndex::new();
        index.join(&socket("s1"), &room("A"));
        index.join(&socket("s2"), &room("A"));
        index.join(&socket("s1"), &room("B"));

        // when (操作):
        let clients = index.clients(&rooms(&["A", "B"]));

        // then (期待する結果):
        assert_eq!(clients, vec![socket("s1"), socket("s2")]);
    }

    #[test]
    fn test_clients_looks_up_room_names_not_positions() {
        // テスト項目: clients は入力の位置ではなくルーム名そのもので検索する
        // given (前提条件): "0" / "1" という名前のルームを用意
        let mut index = MembershipIndex::new();
        index.join(&socket("by-position"), &room("0"));
        index.join(&socket("by-position"), &room("1"));
        index.join(&socket("by-name"), &room("B"));

        // when (操作):
        let clients = index.clients(&rooms(&["A", "B"]));

        // then (期待する結果):
        assert_eq!(clients, vec![socket("by-name")]);
    }

    #[test]
    fn test_clients_room_order_changes_result_order() {
        // テスト項目: ルームの指定順が結果の順序に反映される
        let mut index = MembershipIndex::new();
        index.join(&socket("x"), &room("A"));
        index.join(&socket("y"), &room("B"));

        assert_eq!(
            index.clients(&rooms(&["B", "A"])),
            vec![socket("y"), socket("x")]
        );
        assert!(index.clients(&RoomSet::default()).is_empty());
        assert!(index.clients(&rooms(&["unknown"])).is_empty());
    }

    #[test]
    fn test_leave_all_prunes_every_room() {
        // テスト項目: leave_all で全ルームから削除され、空のルームは削除される
        // given (前提条件):
        let mut index = MembershipIndex::new();
        index.join_all(&socket("s"), &rooms(&["A", "B", "C"]));
        index.join(&socket("other"), &room("B"));

        // when (操作):
        let left = index.leave_all(&socket("s"));

        // then (期待する結果):
        assert_eq!(left, vec![room("A"), room("B"), room("C")]);
        assert_eq!(index.client_rooms(&socket("s")), None);
        assert_eq!(index.rooms(), vec![room("B")]);
        assert_eq!(index.clients(&rooms(&["A", "B", "C"])), vec![socket("other")]);
        index.assert_consistent();
    }

    #[test]
    fn test_leave_all_unknown_socket() {
        // テスト項目: 未知の socket に対する leave_all は空の結果を返す
        let mut index = MembershipIndex::new();
        index.join(&socket("s"), &room("A"));
        assert!(index.leave_all(&socket("ghost")).is_empty());
        assert_eq!(index.socket_count(), 1);
    }

    #[test]
    fn test_client_rooms_unknown_is_none() {
        // テスト項目: 未知の socket の client_rooms は None (unknown) を返す
        let index = MembershipIndex::new();
        assert_eq!(index.client_rooms(&socket("ghost")), None);
    }

    #[test]
    fn test_invariant_holds_over_operation_sequence() {
        // テスト項目: join / join_all / leave / leave_all の任意の列で不変条件が保たれる
        // given (前提条件): 決定的な擬似乱数で操作列を生成
        let sockets: Vec<SocketId> = (0..6).map(|i| socket(&format!("s{i}"))).collect();
        let names: Vec<RoomName> = (0..5).map(|i| room(&format!("r{i}"))).collect();
        let mut index = MembershipIndex::new();
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = |bound: usize| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % bound as u64) as usize
        };

        // when (操作) / then (期待する結果): 毎操作後に整合性を検査
        for _ in 0..2_000 {
            let s = &sockets[next(sockets.len())];
            match next(4) {
                0 => {
                    index.join(s, &names[next(names.len())]);
                }
                1 => {
                    let set: RoomSet = (0..next(3) + 1)
                        .map(|_| names[next(names.len())].clone())
                        .collect();
                    index.join_all(s, &set);
                    for r in &set {
                        assert!(index.contains(s, r));
                    }
                }
                2 => {
                    let r = &names[next(names.len())];
                    index.leave(s, r);
                    assert!(!index.contains(s, r));
                }
                _ => {
                    index.leave_all(s);
                    assert_eq!(index.client_rooms(s), None);
                }
            }
            index.assert_consistent();
        }
    }
}
