//! 永続化ストアの実装
//!
//! メッセージ履歴・ルーム参加履歴・グループ一覧の各 Repository trait を実装します。
//! UseCase 層は `Arc<dyn ...Repository>` 越しにのみ利用します。
//! サーバーは SQLite を使い、テストはインメモリ実装も使います。

pub mod inmemory;
pub mod sqlite;

pub use inmemory::{InMemoryGroupRepository, InMemoryMessageRepository, InMemoryRoomMemberRepository};
pub use sqlite::{
    SqliteDatabase, SqliteGroupRepository, SqliteMessageRepository, SqliteRoomMemberRepository,
};
