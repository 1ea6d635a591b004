//! プレゼンス管理（プロセス内・揮発性）
//!
//! - [`IdentityRegistry`]: 接続 ID → 表示名
//! - [`RoomMembershipTracker`]: 接続 ID → 参加中のルーム集合
//!
//! どちらも内部のマップを公開せず、不可分な操作のみを提供します。
//! ロックを保持したまま I/O や配送を行わないこと。

mod identity;
mod membership;

pub use identity::{IdentityRegistry, RegistryError};
pub use membership::RoomMembershipTracker;
