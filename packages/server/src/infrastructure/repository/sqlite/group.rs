//! SQLite Group Repository 実装

use async_trait::async_trait;
use rusqlite::params;

use super::{SqliteDatabase, decode};
use crate::domain::{Group, GroupName, GroupRepository, RepositoryError, Timestamp};

/// SQLite Group Repository 実装
pub struct SqliteGroupRepository {
    db: SqliteDatabase,
}

impl SqliteGroupRepository {
    /// 新しい SqliteGroupRepository を作成
    pub fn new(db: SqliteDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GroupRepository for SqliteGroupRepository {
    async fn list(&self) -> Result<Vec<Group>, RepositoryError> {
        self.db
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT id, name, created_at FROM chat_groups ORDER BY id")?;
                let rows = stmt.query_map([], |row| {
                    Ok(Group {
                        id: row.get::<_, i64>(0)? as u64,
                        name: decode(1, GroupName::new(row.get::<_, String>(1)?))?,
                        created_at: Timestamp::new(row.get(2)?),
                    })
                })?;
                Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
            })
            .await
    }

    async fn create(
        &self,
        name: GroupName,
        created_at: Timestamp,
    ) -> Result<Group, RepositoryError> {
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO chat_groups (name, created_at) VALUES (?1, ?2)",
                    params![name.as_str(), created_at.value()],
                )?;
                Ok(Group {
                    id: conn.last_insert_rowid() as u64,
                    name,
                    created_at,
                })
            })
            .await
    }
}
