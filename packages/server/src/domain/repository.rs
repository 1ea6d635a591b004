//! Repository trait definitions (persistent store).
//!
//! The domain layer only declares what it needs from durable storage;
//! implementations live in `crate::infrastructure::repository`.

use async_trait::async_trait;

use super::{
    entity::{Group, Message, NewMessage, NewRoomMember, RoomMember},
    error::RepositoryError,
    value_object::{ConnectionId, DisplayName, GroupName, RoomName, Timestamp},
};

/// Message history store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message and return it with its assigned id
    async fn create(&self, message: NewMessage) -> Result<Message, RepositoryError>;

    /// Non-private messages of a room, oldest first
    async fn find_by_room(&self, room: &RoomName) -> Result<Vec<Message>, RepositoryError>;

    /// Private messages exchanged between two users in either direction, oldest first
    async fn find_by_participants(
        &self,
        me: &ConnectionId,
        peer: &ConnectionId,
    ) -> Result<Vec<Message>, RepositoryError>;
}

/// Durable room membership store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomMemberRepository: Send + Sync {
    /// Find the row for `(room, user_id)`
    async fn find(
        &self,
        room: &RoomName,
        user_id: &ConnectionId,
    ) -> Result<Option<RoomMember>, RepositoryError>;

    /// Insert a new row
    async fn create(&self, member: NewRoomMember) -> Result<RoomMember, RepositoryError>;

    /// Replace the stored display name of an existing row
    async fn update_name(
        &self,
        id: u64,
        user_name: DisplayName,
    ) -> Result<RoomMember, RepositoryError>;

    /// Every row of a room
    async fn list_by_room(&self, room: &RoomName) -> Result<Vec<RoomMember>, RepositoryError>;
}

/// Group catalog store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// All groups in creation order
    async fn list(&self) -> Result<Vec<Group>, RepositoryError>;

    /// Insert a new group
    async fn create(&self, name: GroupName, created_at: Timestamp)
    -> Result<Group, RepositoryError>;
}
