//! InMemory Repository 実装
//!
//! プロセス内の `Vec` をテーブルとして扱う実装です。
//! ID は各テーブルの連番で、ロックを保持したまま採番と挿入を行います。

mod group;
mod message;
mod room_member;

pub use group::InMemoryGroupRepository;
pub use message::InMemoryMessageRepository;
pub use room_member::InMemoryRoomMemberRepository;
