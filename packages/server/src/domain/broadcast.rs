//! Broadcast engine.
//!
//! Resolves the recipients of a room set against the connection registry,
//! delivers the payload once per socket and repairs stale memberships.

use super::{
    BroadcastReport, ConnectionRegistry, MembershipIndex, Payload, RoomSet, SocketId,
};

/// Deliver `payload` to every distinct member of `rooms`, skipping `except`.
///
/// A member whose registry lookup fails is treated as stale and removed from
/// every room it belongs to, so that later passes do not consider it again.
/// This keeps the index converging on the registry even when a disconnect
/// notification was lost or arrived late.
pub fn fan_out(
    index: &mut MembershipIndex,
    registry: &dyn ConnectionRegistry,
    payload: &Payload,
    rooms: &RoomSet,
    except: Option<&SocketId>,
) -> BroadcastReport {
    let mut report = BroadcastReport::default();

    for socket in index.clients(rooms) {
        if except == Some(&socket) {
            continue;
        }

        match registry.lookup(&socket) {
            Some(connection) => {
                connection.send(payload.clone());
                report.delivered.push(socket);
            }
            None => {
                let rooms_left = index.leave_all(&socket);
                tracing::debug!(
                    "Pruned stale socket '{}' from {} room(s)",
                    socket,
                    rooms_left.len()
                );
                report.pruned.push(socket);
            }
        }
    }

    report
}
