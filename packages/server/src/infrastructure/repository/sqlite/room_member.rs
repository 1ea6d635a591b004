//! SQLite RoomMember Repository 実装

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{SqliteDatabase, decode};
use crate::domain::{
    ConnectionId, DisplayName, NewRoomMember, RepositoryError, RoomMember, RoomMemberRepository,
    RoomName, Timestamp,
};

const COLUMNS: &str = "id, room, user_id, user_name, joined_at";

/// SQLite RoomMember Repository 実装
///
/// `(room, user_id)` には一意制約があります。
pub struct SqliteRoomMemberRepository {
    db: SqliteDatabase,
}

impl SqliteRoomMemberRepository {
    /// 新しい SqliteRoomMemberRepository を作成
    pub fn new(db: SqliteDatabase) -> Self {
        Self { db }
    }
}

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<RoomMember> {
    Ok(RoomMember {
        id: row.get::<_, i64>(0)? as u64,
        room: decode(1, RoomName::new(row.get::<_, String>(1)?))?,
        user_id: decode(2, ConnectionId::new(row.get::<_, String>(2)?))?,
        user_name: decode(3, DisplayName::new(row.get::<_, String>(3)?))?,
        joined_at: Timestamp::new(row.get(4)?),
    })
}

fn find_by_id(conn: &Connection, id: i64) -> Result<Option<RoomMember>, RepositoryError> {
    let sql = format!("SELECT {COLUMNS} FROM room_members WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], member_from_row)
        .optional()?)
}

#[async_trait]
impl RoomMemberRepository for SqliteRoomMemberRepository {
    async fn find(
        &self,
        room: &RoomName,
        user_id: &ConnectionId,
    ) -> Result<Option<RoomMember>, RepositoryError> {
        let (room, user_id) = (room.clone(), user_id.clone());
        self.db
            .call(move |conn| {
                let sql = format!("SELECT {COLUMNS} FROM room_members WHERE room = ?1 AND user_id = ?2");
                Ok(conn
                    .query_row(&sql, params![room.as_str(), user_id.as_str()], member_from_row)
                    .optional()?)
            })
            .await
    }

    async fn create(&self, member: NewRoomMember) -> Result<RoomMember, RepositoryError> {
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO room_members (room, user_id, user_name, joined_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        member.room.as_str(),
                        member.user_id.as_str(),
                        member.user_name.as_str(),
                        member.joined_at.value(),
                    ],
                )?;
                Ok(RoomMember {
                    id: conn.last_insert_rowid() as u64,
                    room: member.room,
                    user_id: member.user_id,
                    user_name: member.user_name,
                    joined_at: member.joined_at,
                })
            })
            .await
    }

    async fn update_name(
        &self,
        id: u64,
        user_name: DisplayName,
    ) -> Result<RoomMember, RepositoryError> {
        let not_found = move || RepositoryError::NotFound(format!("room member {id}"));
        let row_id = i64::try_from(id).map_err(|_| not_found())?;
        self.db
            .call(move |conn| {
                conn.execute(
                    "UPDATE room_members SET user_name = ?1 WHERE id = ?2",
                    params![user_name.as_str(), row_id],
                )?;
                find_by_id(conn, row_id)?.ok_or_else(not_found)
            })
            .await
    }

    async fn list_by_room(&self, room: &RoomName) -> Result<Vec<RoomMember>, RepositoryError> {
        let room = room.clone();
        self.db
            .call(move |conn| {
                let sql = format!("SELECT {COLUMNS} FROM room_members WHERE room = ?1 ORDER BY id");
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![room.as_str()], member_from_row)?;
                Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
            })
            .await
    }
}
