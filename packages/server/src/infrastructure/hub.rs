//! 接続ハブ（トランスポートへの配送）
//!
//! WebSocket ごとの送信チャンネルを保持し、
//! 「1 接続へ」「ルーム参加者全員へ」「全接続へ」の配送を提供します。
//! 送信対象はロック中にスナップショットを取り、ロック解放後に送信します。

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, mpsc::UnboundedSender};

use super::{dto::websocket::ServerEvent, presence::RoomMembershipTracker};
use crate::domain::{ConnectionId, RoomName};

/// 接続 ID → 送信チャンネル
pub struct ConnectionHub {
    senders: Mutex<HashMap<ConnectionId, UnboundedSender<String>>>,
    rooms: Arc<RoomMembershipTracker>,
}

impl ConnectionHub {
    /// 新しい ConnectionHub を作成
    ///
    /// ルーム宛て配送の宛先解決には `rooms` を使います。
    pub fn new(rooms: Arc<RoomMembershipTracker>) -> Self {
        Self {
            senders: Mutex::new(HashMap::new()),
            rooms,
        }
    }

    /// 接続の送信チャンネルを登録
    pub async fn attach(&self, connection_id: ConnectionId, sender: UnboundedSender<String>) {
        self.senders.lock().await.insert(connection_id, sender);
    }

    /// 接続の送信チャンネルを削除
    pub async fn detach(&self, connection_id: &ConnectionId) -> bool {
        self.senders.lock().await.remove(connection_id).is_some()
    }

    /// 登録中の接続数
    #[cfg(test)]
    pub async fn count(&self) -> usize {
        self.senders.lock().await.len()
    }

    /// 1 接続へ送信
    ///
    /// # Returns
    ///
    /// 送信できた場合は `true`
    pub async fn send_to(&self, connection_id: &ConnectionId, event: &ServerEvent) -> bool {
        let Some(json) = encode(event) else {
            return false;
        };
        let sender = self.senders.lock().await.get(connection_id).cloned();
        match sender {
            Some(sender) => deliver(connection_id, &sender, json),
            None => {
                tracing::debug!("No sender for connection '{}'", connection_id);
                false
            }
        }
    }

    /// ルームに参加中の全接続へ送信
    ///
    /// # Returns
    ///
    /// 送信できた接続数
    pub async fn send_to_room(&self, room: &RoomName, event: &ServerEvent) -> usize {
        let Some(json) = encode(event) else {
            return 0;
        };
        let members = self.rooms.connections_in(room).await;
        let targets: Vec<(ConnectionId, UnboundedSender<String>)> = {
            let senders = self.senders.lock().await;
            members
                .into_iter()
                .filter_map(|id| senders.get(&id).cloned().map(|sender| (id, sender)))
                .collect()
        };
        targets
            .iter()
            .filter(|(id, sender)| deliver(id, sender, json.clone()))
            .count()
    }

    /// 全接続へ送信
    pub async fn send_to_all(&self, event: &ServerEvent) -> usize {
        let Some(json) = encode(event) else {
            return 0;
        };
        let targets: Vec<(ConnectionId, UnboundedSender<String>)> = {
            let senders = self.senders.lock().await;
            senders
                .iter()
                .map(|(id, sender)| (id.clone(), sender.clone()))
                .collect()
        };
        targets
            .iter()
            .filter(|(id, sender)| deliver(id, sender, json.clone()))
            .count()
    }
}

fn encode(event: &ServerEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize server event: {}", e);
            None
        }
    }
}

fn deliver(connection_id: &ConnectionId, sender: &UnboundedSender<String>, json: String) -> bool {
    if sender.send(json).is_err() {
        tracing::warn!("Failed to send event to connection '{}'", connection_id);
        return false;
    }
    true
}
