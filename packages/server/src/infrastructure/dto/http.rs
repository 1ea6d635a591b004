//! HTTP API request/response DTOs for the chat application.
//!
//! `MessageDto` and `GroupDto` are also embedded in WebSocket events.

use serde::{Deserialize, Serialize};

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{Group, Message};

/// Stored message as seen by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: u64,
    pub room: String,
    pub author: String,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    pub content: String,
    pub is_private: bool,
    pub created_at: String, // ISO 8601
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            room: message.room.as_str().to_string(),
            author: message.author.as_str().to_string(),
            author_id: message.author_id.as_str().to_string(),
            recipient: message.recipient.as_ref().map(|r| r.as_str().to_string()),
            recipient_id: message.recipient_id.as_ref().map(|r| r.as_str().to_string()),
            content: message.content.as_str().to_string(),
            is_private: message.is_private,
            created_at: timestamp_to_rfc3339(message.created_at.value()),
        }
    }
}

/// Group catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDto {
    pub id: u64,
    pub name: String,
    pub created_at: String, // ISO 8601
}

impl From<&Group> for GroupDto {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            name: group.name.as_str().to_string(),
            created_at: timestamp_to_rfc3339(group.created_at.value()),
        }
    }
}

/// Body of `POST /groups`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    #[serde(default)]
    pub name: String,
}

/// Query of `GET /dm/{peer}/messages`
#[derive(Debug, Clone, Deserialize)]
pub struct DirectMessagesQuery {
    #[serde(default)]
    pub me: String,
}

/// Error body returned by HTTP handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
