//! InMemory RoomMember Repository 実装

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DisplayName, NewRoomMember, RepositoryError, RoomMember, RoomMemberRepository,
    RoomName,
};

#[derive(Default)]
struct RoomMemberTable {
    rows: Vec<RoomMember>,
    next_id: u64,
}

/// インメモリ RoomMember Repository 実装
///
/// `(room, user_id)` の一意性は呼び出し側（JoinRoomUseCase）の upsert で保証します。
#[derive(Default)]
pub struct InMemoryRoomMemberRepository {
    table: Mutex<RoomMemberTable>,
}

impl InMemoryRoomMemberRepository {
    /// 新しい InMemoryRoomMemberRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomMemberRepository for InMemoryRoomMemberRepository {
    async fn find(
        &self,
        room: &RoomName,
        user_id: &ConnectionId,
    ) -> Result<Option<RoomMember>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .iter()
            .find(|m| &m.room == room && &m.user_id == user_id)
            .cloned())
    }

    async fn create(&self, member: NewRoomMember) -> Result<RoomMember, RepositoryError> {
        let mut table = self.table.lock().await;
        table.next_id += 1;
        let stored = RoomMember {
            id: table.next_id,
            room: member.room,
            user_id: member.user_id,
            user_name: member.user_name,
            joined_at: member.joined_at,
        };
        table.rows.push(stored.clone());
        Ok(stored)
    }

    async fn update_name(
        &self,
        id: u64,
        user_name: DisplayName,
    ) -> Result<RoomMember, RepositoryError> {
        let mut table = self.table.lock().await;
        let row = table
            .rows
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("room member {id}")))?;
        row.user_name = user_name;
        Ok(row.clone())
    }

    async fn list_by_room(&self, room: &RoomName) -> Result<Vec<RoomMember>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .iter()
            .filter(|m| &m.room == room)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;

    fn new_member(room: &str, user_id: &str, name: &str) -> NewRoomMember {
        NewRoomMember {
            room: RoomName::new(room).unwrap(),
            user_id: ConnectionId::new(user_id).unwrap(),
            user_name: DisplayName::new(name).unwrap(),
            joined_at: Timestamp::new(1000),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        // テスト項目: 作成した行を (room, user_id) で取得できる
        // given (前提条件):
        let repo = InMemoryRoomMemberRepository::new();
        repo.create(new_member("rust", "a1", "Alice")).await.unwrap();

        // when (操作):
        let found = repo
            .find(&RoomName::new("rust").unwrap(), &ConnectionId::new("a1").unwrap())
            .await
            .unwrap();
        let missing = repo
            .find(&RoomName::new("go").unwrap(), &ConnectionId::new("a1").unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(found.unwrap().user_name.as_str(), "Alice");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_name() {
        // テスト項目: 既存行の表示名だけを更新できる
        // given (前提条件):
        let repo = InMemoryRoomMemberRepository::new();
        let created = repo.create(new_member("rust", "a1", "Alice")).await.unwrap();

        // when (操作):
        let updated = repo
            .update_name(created.id, DisplayName::new("Alicia").unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.user_name.as_str(), "Alicia");
        assert_eq!(updated.joined_at, created.joined_at);
    }

    #[tokio::test]
    async fn test_update_name_missing_row() {
        // テスト項目: 存在しない行の更新は NotFound になる
        // given (前提条件):
        let repo = InMemoryRoomMemberRepository::new();

        // when (操作):
        let result = repo.update_name(99, DisplayName::new("Ghost").unwrap()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_by_room() {
        // テスト項目: ルームごとの行一覧を取得できる
        // given (前提条件):
        let repo = InMemoryRoomMemberRepository::new();
        repo.create(new_member("rust", "a1", "Alice")).await.unwrap();
        repo.create(new_member("rust", "b2", "Bob")).await.unwrap();
        repo.create(new_member("go", "a1", "Alice")).await.unwrap();

        // when (操作):
        let rows = repo.list_by_room(&RoomName::new("rust").unwrap()).await.unwrap();

        // then (期待する結果):
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|m| m.room.as_str() == "rust"));
    }
}
