//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// ConnectionId too long error
    #[error("ConnectionId cannot exceed {max} characters (got {actual})")]
    ConnectionIdTooLong { max: usize, actual: usize },

    /// DisplayName validation error
    #[error("display name required")]
    DisplayNameEmpty,

    /// DisplayName too long error
    #[error("display name cannot exceed {max} characters (got {actual})")]
    DisplayNameTooLong { max: usize, actual: usize },

    /// RoomName validation error
    #[error("room name cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("room name cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// MessageContent validation error
    #[error("message content cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("message content cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    /// GroupName validation error
    #[error("group name cannot be empty")]
    GroupNameEmpty,

    /// GroupName too long error
    #[error("group name cannot exceed {max} characters (got {actual})")]
    GroupNameTooLong { max: usize, actual: usize },
}

/// Errors raised by the persistent store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing store rejected or could not complete the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The record to update does not exist
    #[error("record not found: {0}")]
    NotFound(String),
}
