//! Infrastructure layer
//!
//! ドメイン層が定義する trait の具体的な実装（インメモリストア）、
//! 接続ごとのプレゼンス管理、WebSocket への配送、DTO を提供します。

pub mod dto;
pub mod hub;
pub mod presence;
pub mod repository;

pub use hub::ConnectionHub;
pub use presence::{IdentityRegistry, RegistryError, RoomMembershipTracker};
