//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層とプレゼンス管理を操作します。

pub mod connect_participant;
pub mod create_group;
pub mod disconnect_participant;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod roster;
pub mod send_message;
pub mod send_private_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_participant::ConnectParticipantUseCase;
pub use create_group::CreateGroupUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::ChatError;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use roster::RosterBuilder;
pub use send_message::SendMessageUseCase;
pub use send_private_message::SendPrivateMessageUseCase;
