//! SQLite Message Repository 実装

use async_trait::async_trait;
use rusqlite::{Connection, Row, params};

use super::{SqliteDatabase, decode};
use crate::domain::{
    ConnectionId, DisplayName, Message, MessageContent, MessageRepository, NewMessage,
    RepositoryError, RoomName, Timestamp,
};

const COLUMNS: &str =
    "id, room, author, author_id, recipient, recipient_id, content, is_private, created_at";

/// SQLite Message Repository 実装
pub struct SqliteMessageRepository {
    db: SqliteDatabase,
}

impl SqliteMessageRepository {
    /// 新しい SqliteMessageRepository を作成
    pub fn new(db: SqliteDatabase) -> Self {
        Self { db }
    }
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get::<_, i64>(0)? as u64,
        room: decode(1, RoomName::new(row.get::<_, String>(1)?))?,
        author: decode(2, DisplayName::new(row.get::<_, String>(2)?))?,
        author_id: decode(3, ConnectionId::new(row.get::<_, String>(3)?))?,
        recipient: decode(
            4,
            row.get::<_, Option<String>>(4)?
                .map(DisplayName::new)
                .transpose(),
        )?,
        recipient_id: decode(
            5,
            row.get::<_, Option<String>>(5)?
                .map(ConnectionId::new)
                .transpose(),
        )?,
        content: decode(6, MessageContent::new(row.get::<_, String>(6)?))?,
        is_private: row.get(7)?,
        created_at: Timestamp::new(row.get(8)?),
    })
}

fn query_messages(
    conn: &Connection,
    filter: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Message>, RepositoryError> {
    let sql = format!("SELECT {COLUMNS} FROM messages WHERE {filter} ORDER BY created_at, id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, message_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message, RepositoryError> {
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO messages
                     (room, author, author_id, recipient, recipient_id, content, is_private, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        message.room.as_str(),
                        message.author.as_str(),
                        message.author_id.as_str(),
                        message.recipient.as_ref().map(DisplayName::as_str),
                        message.recipient_id.as_ref().map(ConnectionId::as_str),
                        message.content.as_str(),
                        message.is_private,
                        message.created_at.value(),
                    ],
                )?;
                let id = conn.last_insert_rowid() as u64;
                Ok(Message::from_new(id, message))
            })
            .await
    }

    async fn find_by_room(&self, room: &RoomName) -> Result<Vec<Message>, RepositoryError> {
        let room = room.clone();
        self.db
            .call(move |conn| {
                query_messages(conn, "room = ?1 AND is_private = 0", params![room.as_str()])
            })
            .await
    }

    async fn find_by_participants(
        &self,
        me: &ConnectionId,
        peer: &ConnectionId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let (me, peer) = (me.clone(), peer.clone());
        self.db
            .call(move |conn| {
                query_messages(
                    conn,
                    "is_private = 1
                     AND ((author_id = ?1 AND recipient_id = ?2)
                       OR (author_id = ?2 AND recipient_id = ?1))",
                    params![me.as_str(), peer.as_str()],
                )
            })
            .await
    }
}
