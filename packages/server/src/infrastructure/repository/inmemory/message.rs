//! InMemory Message Repository 実装

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Message, MessageRepository, NewMessage, RepositoryError, RoomName};

#[derive(Default)]
struct MessageTable {
    rows: Vec<Message>,
    next_id: u64,
}

/// インメモリ Message Repository 実装
///
/// 行は挿入順（= 作成時刻順）に保持されます。
#[derive(Default)]
pub struct InMemoryMessageRepository {
    table: Mutex<MessageTable>,
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みメッセージ数を取得
    #[cfg(test)]
    pub async fn count(&self) -> usize {
        self.table.lock().await.rows.len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message, RepositoryError> {
        let mut table = self.table.lock().await;
        table.next_id += 1;
        let stored = Message::from_new(table.next_id, message);
        table.rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_room(&self, room: &RoomName) -> Result<Vec<Message>, RepositoryError> {
        let table = self.table.lock().await;
        let mut messages: Vec<Message> = table
            .rows
            .iter()
            .filter(|m| &m.room == room && !m.is_private)
            .cloned()
            .collect();
        messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(messages)
    }

    async fn find_by_participants(
        &self,
        me: &ConnectionId,
        peer: &ConnectionId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let table = self.table.lock().await;
        let mut messages: Vec<Message> = table
            .rows
            .iter()
            .filter(|m| m.is_private && m.is_between(me, peer))
            .cloned()
            .collect();
        messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(messages)
    }
}
