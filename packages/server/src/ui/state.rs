//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::{GroupRepository, MessageRepository, RoomMemberRepository},
    infrastructure::{
        ConnectionHub, IdentityRegistry, RoomMembershipTracker,
        repository::{
            InMemoryGroupRepository, InMemoryMessageRepository, InMemoryRoomMemberRepository,
            SqliteDatabase, SqliteGroupRepository, SqliteMessageRepository,
            SqliteRoomMemberRepository,
        },
    },
};

/// Shared application state
///
/// プレゼンス（揮発性）と Repository（永続化の抽象）をまとめて保持します。
#[derive(Clone)]
pub struct AppState {
    /// 接続 → Identity
    pub identities: Arc<IdentityRegistry>,
    /// 接続 ↔ 参加中ルーム
    pub rooms: Arc<RoomMembershipTracker>,
    /// 接続ごとの送信チャンネル
    pub hub: Arc<ConnectionHub>,
    pub messages: Arc<dyn MessageRepository>,
    pub members: Arc<dyn RoomMemberRepository>,
    pub groups: Arc<dyn GroupRepository>,
}

impl AppState {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        members: Arc<dyn RoomMemberRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        let rooms = Arc::new(RoomMembershipTracker::new());
        Self {
            identities: Arc::new(IdentityRegistry::new()),
            hub: Arc::new(ConnectionHub::new(rooms.clone())),
            rooms,
            messages,
            members,
            groups,
        }
    }

    /// インメモリストアを使う状態を作成（ロビーのグループは登録済み）
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryMessageRepository::new()),
            Arc::new(InMemoryRoomMemberRepository::new()),
            Arc::new(InMemoryGroupRepository::seeded()),
        )
    }

    /// SQLite データベースを使う状態を作成
    pub fn sqlite(db: SqliteDatabase) -> Self {
        Self::new(
            Arc::new(SqliteMessageRepository::new(db.clone())),
            Arc::new(SqliteRoomMemberRepository::new(db.clone())),
            Arc::new(SqliteGroupRepository::new(db)),
        )
    }
}
