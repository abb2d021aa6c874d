//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

use super::error::ValueObjectError;

/// Maximum length of a SocketId or RoomName in bytes
pub const MAX_ID_LENGTH: usize = 100;

/// Maximum size of a broadcast payload in bytes
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// Socket identifier value object.
///
/// Opaque, stable identifier of a live connection. The connection itself is
/// owned by the connection registry; the membership index only stores ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SocketId(String);

impl SocketId {
    /// Create a new SocketId.
    ///
    /// # Arguments
    ///
    /// * `id` - The socket identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the SocketId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::SocketIdEmpty);
        }
        let len = id.len();
        if len > MAX_ID_LENGTH {
            return Err(ValueObjectError::SocketIdTooLong {
                max: MAX_ID_LENGTH,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for SocketId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for SocketId {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<SocketId> for String {
    fn from(value: SocketId) -> Self {
        value.0
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name value object.
///
/// Opaque identifier of a broadcast group. A room exists only while it has
/// at least one member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomName(String);

impl RoomName {
    /// Create a new RoomName.
    ///
    /// # Arguments
    ///
    /// * `name` - The room name string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomName or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::RoomNameEmpty);
        }
        let len = name.len();
        if len > MAX_ID_LENGTH {
            return Err(ValueObjectError::RoomNameTooLong {
                max: MAX_ID_LENGTH,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<RoomName> for String {
    fn from(value: RoomName) -> Self {
        value.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One room or an ordered sequence of rooms.
///
/// Accepted wherever an operation targets "a room set". Order is the
/// caller's order and duplicates are kept; consumers deduplicate recipients,
/// not rooms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomSet(Vec<RoomName>);

impl RoomSet {
    /// Create a room set from an ordered list of rooms.
    pub fn new(rooms: Vec<RoomName>) -> Self {
        Self(rooms)
    }

    /// Parse a comma separated list such as `"lobby,news"`.
    ///
    /// Blank segments are skipped; any other invalid segment is an error.
    pub fn parse_list(list: &str) -> Result<Self, ValueObjectError> {
        list.split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(RoomName::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Iterate over the rooms in caller order.
    pub fn iter(&self) -> std::slice::Iter<'_, RoomName> {
        self.0.iter()
    }

    /// Number of rooms listed (duplicates included).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no room is listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to the underlying list.
    pub fn into_vec(self) -> Vec<RoomName> {
        self.0
    }
}

impl From<RoomName> for RoomSet {
    fn from(room: RoomName) -> Self {
        Self(vec![room])
    }
}

impl From<&RoomName> for RoomSet {
    fn from(room: &RoomName) -> Self {
        Self(vec![room.clone()])
    }
}

impl From<Vec<RoomName>> for RoomSet {
    fn from(rooms: Vec<RoomName>) -> Self {
        Self(rooms)
    }
}

impl From<&[RoomName]> for RoomSet {
    fn from(rooms: &[RoomName]) -> Self {
        Self(rooms.to_vec())
    }
}

impl<const N: usize> From<[RoomName; N]> for RoomSet {
    fn from(rooms: [RoomName; N]) -> Self {
        Self(rooms.into())
    }
}

impl FromIterator<RoomName> for RoomSet {
    fn from_iter<I: IntoIterator<Item = RoomName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RoomSet {
    type Item = &'a RoomName;
    type IntoIter = std::slice::Iter<'a, RoomName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Broadcast payload value object.
///
/// Opaque bytes handed to every recipient. Backed by a shared buffer so that
/// fanning out to many sockets does not copy the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Arc<[u8]>);

impl Payload {
    /// Create a new Payload from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::PayloadEmpty` for an empty buffer and
    /// `ValueObjectError::PayloadTooLarge` above [`MAX_PAYLOAD_SIZE`].
    pub fn new(bytes: Vec<u8>) -> Result<Self, ValueObjectError> {
        if bytes.is_empty() {
            return Err(ValueObjectError::PayloadEmpty);
        }
        let len = bytes.len();
        if len > MAX_PAYLOAD_SIZE {
            return Err(ValueObjectError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: len,
            });
        }
        Ok(Self(bytes.into()))
    }

    /// Create a new Payload from a text frame.
    pub fn from_text(text: String) -> Result<Self, ValueObjectError> {
        Self::new(text.into_bytes())
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the payload as UTF-8 text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

}
