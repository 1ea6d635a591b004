//! Core domain models for the chat application.

use super::value_object::{
    ConnectionId, DisplayName, GroupName, MessageContent, RoomName, Timestamp,
};

/// The display name bound to a live connection once its first join succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Connection the identity belongs to
    pub connection_id: ConnectionId,
    /// Trimmed display name, unique among online identities ignoring case
    pub display_name: DisplayName,
}

impl Identity {
    /// Create a new identity
    pub fn new(connection_id: ConnectionId, display_name: DisplayName) -> Self {
        Self {
            connection_id,
            display_name,
        }
    }

    /// User id exposed to clients; identical to the connection id.
    pub fn user_id(&self) -> &ConnectionId {
        &self.connection_id
    }
}

/// A message about to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub room: RoomName,
    pub author: DisplayName,
    pub author_id: ConnectionId,
    pub recipient: Option<DisplayName>,
    pub recipient_id: Option<ConnectionId>,
    pub content: MessageContent,
    pub is_private: bool,
    pub created_at: Timestamp,
}

impl NewMessage {
    /// Build a public message for a room
    pub fn room(
        author: &Identity,
        room: RoomName,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            room,
            author: author.display_name.clone(),
            author_id: author.connection_id.clone(),
            recipient: None,
            recipient_id: None,
            content,
            is_private: false,
            created_at,
        }
    }

    /// Build a direct message; the room is the sender-first pair key
    pub fn direct(
        author: &Identity,
        recipient: &Identity,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            room: RoomName::direct(author.user_id(), recipient.user_id()),
            author: author.display_name.clone(),
            author_id: author.connection_id.clone(),
            recipient: Some(recipient.display_name.clone()),
            recipient_id: Some(recipient.connection_id.clone()),
            content,
            is_private: true,
            created_at,
        }
    }
}

/// A persisted chat or direct message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Store-assigned identifier
    pub id: u64,
    pub room: RoomName,
    pub author: DisplayName,
    pub author_id: ConnectionId,
    pub recipient: Option<DisplayName>,
    pub recipient_id: Option<ConnectionId>,
    pub content: MessageContent,
    pub is_private: bool,
    pub created_at: Timestamp,
}

impl Message {
    /// Attach a store id to a new message
    pub fn from_new(id: u64, message: NewMessage) -> Self {
        Self {
            id,
            room: message.room,
            author: message.author,
            author_id: message.author_id,
            recipient: message.recipient,
            recipient_id: message.recipient_id,
            content: message.content,
            is_private: message.is_private,
            created_at: message.created_at,
        }
    }

    /// Whether the message was exchanged between the two users, in either direction
    pub fn is_between(&self, a: &ConnectionId, b: &ConnectionId) -> bool {
        let Some(recipient_id) = self.recipient_id.as_ref() else {
            return false;
        };
        (&self.author_id == a && recipient_id == b) || (&self.author_id == b && recipient_id == a)
    }
}

/// A durable membership row about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoomMember {
    pub room: RoomName,
    pub user_id: ConnectionId,
    pub user_name: DisplayName,
    pub joined_at: Timestamp,
}

/// Durable record that a user has joined a room at least once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    pub id: u64,
    pub room: RoomName,
    pub user_id: ConnectionId,
    /// Last known display name
    pub user_name: DisplayName,
    /// Time of the first join
    pub joined_at: Timestamp,
}

/// Group catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: u64,
    pub name: GroupName,
    pub created_at: Timestamp,
}

/// One line of a room roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub user_id: ConnectionId,
    pub display_name: DisplayName,
    pub is_online: bool,
}
