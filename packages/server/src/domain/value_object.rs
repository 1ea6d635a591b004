//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Name of the lobby room every client lands in when no room is given.
///
/// The lobby is not tracked: it has no durable membership rows and no roster.
pub const LOBBY_ROOM: &str = "general";

const CONNECTION_ID_MAX: usize = 100;
const DISPLAY_NAME_MAX: usize = 50;
const ROOM_NAME_MAX: usize = 100;
const MESSAGE_CONTENT_MAX: usize = 10000;
const GROUP_NAME_MAX: usize = 100;

/// Connection identifier value object.
///
/// Identifies one live transport session. The same value is exposed to
/// clients as the user id and names the connection's private room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a new ConnectionId.
    ///
    /// # Arguments
    ///
    /// * `id` - The connection identifier string (surrounding whitespace is ignored)
    ///
    /// # Returns
    ///
    /// A Result containing the ConnectionId or an error if validation fails
    pub fn new(id: impl Into<String>) -> Result<Self, ValueObjectError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        let len = id.chars().count();
        if len > CONNECTION_ID_MAX {
            return Err(ValueObjectError::ConnectionIdTooLong {
                max: CONNECTION_ID_MAX,
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

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name value object.
///
/// Names are stored trimmed. Uniqueness among online users is decided with
/// [`DisplayName::eq_ignore_case`], never with `==`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName from raw user input.
    pub fn new(name: impl Into<String>) -> Result<Self, ValueObjectError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        let len = name.chars().count();
        if len > DISPLAY_NAME_MAX {
            return Err(ValueObjectError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Case-insensitive comparison used for the uniqueness check.
    pub fn eq_ignore_case(&self, other: &DisplayName) -> bool {
        self.0 == other.0 || self.0.to_lowercase() == other.0.to_lowercase()
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

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name value object.
///
/// Covers public rooms, the lobby, direct-message history keys and the
/// private per-connection delivery rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    /// Create a new RoomName from raw user input.
    pub fn new(name: impl Into<String>) -> Result<Self, ValueObjectError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValueObjectError::RoomNameEmpty);
        }
        let len = name.chars().count();
        if len > ROOM_NAME_MAX {
            return Err(ValueObjectError::RoomNameTooLong {
                max: ROOM_NAME_MAX,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Parse an optional room field, falling back to the lobby when blank.
    pub fn or_lobby(name: Option<&str>) -> Result<Self, ValueObjectError> {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => Self::new(name),
            _ => Ok(Self::lobby()),
        }
    }

    /// The lobby room.
    pub fn lobby() -> Self {
        Self(LOBBY_ROOM.to_string())
    }

    /// The private room a connection receives direct messages on.
    pub fn private_for(connection_id: &ConnectionId) -> Self {
        Self(connection_id.as_str().to_string())
    }

    /// History key for a direct message.
    ///
    /// The author comes first, so `direct(a, b) != direct(b, a)`.
    pub fn direct(author_id: &ConnectionId, recipient_id: &ConnectionId) -> Self {
        Self(format!("dm:{}:{}", author_id, recipient_id))
    }

    /// Whether this is the lobby room.
    pub fn is_lobby(&self) -> bool {
        self.0 == LOBBY_ROOM
    }

    /// Whether this is the private room of the given connection.
    pub fn is_private_for(&self, connection_id: &ConnectionId) -> bool {
        self.0 == connection_id.as_str()
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

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message content value object.
///
/// Represents the trimmed content of a chat message with validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// # Arguments
    ///
    /// * `content` - The message content string (trimmed before validation)
    ///
    /// # Returns
    ///
    /// A Result containing the MessageContent or an error if validation fails
    pub fn new(content: impl Into<String>) -> Result<Self, ValueObjectError> {
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        let len = content.chars().count();
        if len > MESSAGE_CONTENT_MAX {
            return Err(ValueObjectError::MessageContentTooLong {
                max: MESSAGE_CONTENT_MAX,
                actual: len,
            });
        }
        Ok(Self(content))
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

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Group name value object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupName(String);

impl GroupName {
    /// Create a new GroupName.
    pub fn new(name: impl Into<String>) -> Result<Self, ValueObjectError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValueObjectError::GroupNameEmpty);
        }
        let len = name.chars().count();
        if len > GROUP_NAME_MAX {
            return Err(ValueObjectError::GroupNameTooLong {
                max: GROUP_NAME_MAX,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// The group every deployment starts with; shares the lobby's name.
    pub fn lobby() -> Self {
        Self(LOBBY_ROOM.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    ///
    /// # Arguments
    ///
    /// * `value` - Unix timestamp in milliseconds
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Current time.
    pub fn now() -> Self {
        Self(hiroba_shared::time::now_millis())
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
