//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Group, Identity, Message, NewMessage, NewRoomMember, RoomMember, RosterEntry};
pub use error::{RepositoryError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{GroupRepository, MessageRepository, RoomMemberRepository};
#[cfg(test)]
pub use repository::{MockGroupRepository, MockMessageRepository, MockRoomMemberRepository};
pub use value_object::{
    ConnectionId, DisplayName, GroupName, LOBBY_ROOM, MessageContent, RoomName, Timestamp,
};
