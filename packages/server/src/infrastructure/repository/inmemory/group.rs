//! InMemory Group Repository 実装

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Group, GroupName, GroupRepository, RepositoryError, Timestamp};

#[derive(Default)]
struct GroupTable {
    rows: Vec<Group>,
    next_id: u64,
}

/// インメモリ Group Repository 実装
#[derive(Default)]
pub struct InMemoryGroupRepository {
    table: Mutex<GroupTable>,
}

impl InMemoryGroupRepository {
    /// 新しい InMemoryGroupRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ロビー（`general`）のグループを 1 件持った状態で作成
    pub fn seeded() -> Self {
        let lobby = Group {
            id: 1,
            name: GroupName::lobby(),
            created_at: Timestamp::now(),
        };
        Self {
            table: Mutex::new(GroupTable {
                rows: vec![lobby],
                next_id: 1,
            }),
        }
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn list(&self) -> Result<Vec<Group>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table.rows.clone())
    }

    async fn create(
        &self,
        name: GroupName,
        created_at: Timestamp,
    ) -> Result<Group, RepositoryError> {
        let mut table = self.table.lock().await;
        table.next_id += 1;
        let group = Group {
            id: table.next_id,
            name,
            created_at,
        };
        table.rows.push(group.clone());
        Ok(group)
    }
}
