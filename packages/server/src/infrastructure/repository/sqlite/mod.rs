//! SQLite Repository 実装
//!
//! 1 つの `rusqlite::Connection` を 3 つの Repository で共有します。
//! クエリは `spawn_blocking` 上で実行し、非同期ランタイムのワーカーを塞ぎません。
//! 起動時にスキーマを作成し、ロビー（`general`）のグループが無ければ追加します。

mod group;
mod message;
mod room_member;

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, params, types::Type};

use crate::domain::{LOBBY_ROOM, RepositoryError, Timestamp, ValueObjectError};

pub use group::SqliteGroupRepository;
pub use message::SqliteMessageRepository;
pub use room_member::SqliteRoomMemberRepository;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS messages (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        room         TEXT    NOT NULL,
        author       TEXT    NOT NULL,
        author_id    TEXT    NOT NULL,
        recipient    TEXT,
        recipient_id TEXT,
        content      TEXT    NOT NULL,
        is_private   INTEGER NOT NULL DEFAULT 0,
        created_at   INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_messages_room ON messages (room, created_at);
    CREATE INDEX IF NOT EXISTS idx_messages_pair ON messages (author_id, recipient_id);

    CREATE TABLE IF NOT EXISTS room_members (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        room      TEXT    NOT NULL,
        user_id   TEXT    NOT NULL,
        user_name TEXT    NOT NULL,
        joined_at INTEGER NOT NULL,
        UNIQUE (room, user_id)
    );

    CREATE TABLE IF NOT EXISTS chat_groups (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT    NOT NULL,
        created_at INTEGER NOT NULL
    );
";

impl From<rusqlite::Error> for RepositoryError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Unavailable(e.to_string())
    }
}

/// 共有 SQLite 接続
///
/// `clone()` しても同じ接続を指します。
#[derive(Clone)]
pub struct SqliteDatabase {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatabase {
    /// データベースファイルを開く（無ければ作成）
    ///
    /// `:memory:` を渡すとプロセス内だけのデータベースになります。
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    /// インメモリのデータベースを開く
    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(SCHEMA)?;
        let seeded = conn.execute(
            "INSERT INTO chat_groups (name, created_at)
             SELECT ?1, ?2
             WHERE NOT EXISTS (SELECT 1 FROM chat_groups WHERE name = ?1)",
            params![LOBBY_ROOM, Timestamp::now().value()],
        )?;
        if seeded > 0 {
            tracing::info!("Created default group '{}'", LOBBY_ROOM);
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// ブロッキングスレッドで接続を使う
    async fn call<T, F>(&self, f: F) -> Result<T, RepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, RepositoryError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| RepositoryError::Unavailable("connection lock poisoned".to_string()))?;
            f(&*conn)
        })
        .await
        .map_err(|e| RepositoryError::Unavailable(e.to_string()))?
    }
}

/// 保存済みの値を値オブジェクトに戻す。不正な値は列の変換エラーにする
fn decode<T>(column: usize, value: Result<T, ValueObjectError>) -> rusqlite::Result<T> {
    value.map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// テスト用の一時データベースファイル（終了時に削除）
#[cfg(test)]
struct TempDatabaseFile(std::path::PathBuf);

#[cfg(test)]
impl TempDatabaseFile {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("hiroba-{}.db", uuid::Uuid::new_v4())))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
impl Drop for TempDatabaseFile {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GroupRepository;

    #[tokio::test]
    async fn test_open_seeds_lobby_group() {
        // テスト項目: 新しいデータベースにはロビーのグループが 1 件だけ作られる
        // given (前提条件):
        let db = SqliteDatabase::open_in_memory().unwrap();

        // when (操作):
        let groups = SqliteGroupRepository::new(db).list().await.unwrap();

        // then (期待する結果):
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name.as_str(), LOBBY_ROOM);
    }

    #[tokio::test]
    async fn test_reopen_does_not_duplicate_seed() {
        // テスト項目: 同じファイルを開き直してもロビーのグループは増えない
        // given (前提条件):
        let file = TempDatabaseFile::new();
        drop(SqliteDatabase::open(file.path()).unwrap());

        // when (操作):
        let db = SqliteDatabase::open(file.path()).unwrap();
        let groups = SqliteGroupRepository::new(db).list().await.unwrap();

        // then (期待する結果):
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name.as_str(), LOBBY_ROOM);
    }

    #[test]
    fn test_open_invalid_path_is_unavailable() {
        // テスト項目: 開けないパスは Unavailable になる
        // given (前提条件):
        let path = std::env::temp_dir()
            .join(format!("hiroba-missing-{}", uuid::Uuid::new_v4()))
            .join("chat.db");

        // when (操作):
        let result = SqliteDatabase::open(path);

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
    }
}
