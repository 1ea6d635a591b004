//! WebSocket message DTOs for the chat application.
//!
//! Every frame is a JSON object `{"type": <event>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use super::http::{GroupDto, MessageDto};
use crate::domain::{Identity, RosterEntry};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ClientEvent {
    Join(JoinPayload),
    Chat(ChatPayload),
    Private(PrivatePayload),
    /// Room name to leave
    Leave(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPayload {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivatePayload {
    /// Recipient user id
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub content: String,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "joined")]
    Joined(JoinedPayload),
    #[serde(rename = "users")]
    Users(Vec<UserDto>),
    #[serde(rename = "groups")]
    Groups(Vec<GroupDto>),
    #[serde(rename = "joined:rooms")]
    JoinedRooms(Vec<String>),
    #[serde(rename = "room:members")]
    RoomMembers(RoomMembersPayload),
    #[serde(rename = "chat")]
    Chat(MessageDto),
    #[serde(rename = "private")]
    Private(MessageDto),
    #[serde(rename = "error")]
    Error(ErrorPayload),
    #[serde(rename = "group:created")]
    GroupCreated(GroupDto),
}

impl ServerEvent {
    /// Build an `error` event
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload {
            message: message.into(),
        })
    }

    /// Build a `users` event from registry snapshot
    pub fn users(identities: &[Identity]) -> Self {
        Self::Users(identities.iter().map(UserDto::from).collect())
    }
}

/// Join confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedPayload {
    pub room: String,
    pub name: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Online user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
}

impl From<&Identity> for UserDto {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.user_id().as_str().to_string(),
            name: identity.display_name.as_str().to_string(),
        }
    }
}

/// Roster of a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMembersPayload {
    pub room: String,
    pub members: Vec<RoomMemberDto>,
}

/// One roster line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMemberDto {
    pub id: String,
    pub name: String,
    pub is_online: bool,
}

impl From<&RosterEntry> for RoomMemberDto {
    fn from(entry: &RosterEntry) -> Self {
        Self {
            id: entry.user_id.as_str().to_string(),
            name: entry.display_name.as_str().to_string(),
            is_online: entry.is_online,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}
