//! Room Membership Tracker
//!
//! 接続ごとに「いま参加しているルーム」の集合を保持します（揮発性）。
//! 接続は明示的に参加したルームに加えて、自身の接続 ID と同名の
//! プライベートルームにも所属します（DM の配送先）。

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::domain::{ConnectionId, RoomName};

/// 接続 ID → 参加中ルーム集合
#[derive(Default)]
pub struct RoomMembershipTracker {
    rooms: RwLock<HashMap<ConnectionId, HashSet<RoomName>>>,
}

impl RoomMembershipTracker {
    /// 新しい RoomMembershipTracker を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ルームに参加する（冪等）
    ///
    /// 接続のエントリが無ければ作成します。
    pub async fn join(&self, connection_id: &ConnectionId, room: RoomName) {
        let mut rooms = self.rooms.write().await;
        rooms.entry(connection_id.clone()).or_default().insert(room);
    }

    /// ルームから退出する。参加していなければ何もしない
    ///
    /// # Returns
    ///
    /// 実際に退出した場合は `true`
    pub async fn leave(&self, connection_id: &ConnectionId, room: &RoomName) -> bool {
        let mut rooms = self.rooms.write().await;
        rooms
            .get_mut(connection_id)
            .is_some_and(|joined| joined.remove(room))
    }

    /// 接続が参加中のルーム集合（未知の接続は空集合）
    pub async fn rooms_of(&self, connection_id: &ConnectionId) -> HashSet<RoomName> {
        self.rooms
            .read()
            .await
            .get(connection_id)
            .cloned()
            .unwrap_or_default()
    }

    /// 接続のエントリを削除し、削除直前のルーム集合を返す
    pub async fn drop_connection(&self, connection_id: &ConnectionId) -> HashSet<RoomName> {
        self.rooms
            .write()
            .await
            .remove(connection_id)
            .unwrap_or_default()
    }

    /// ルーム名が接続中のいずれかの接続のプライベートルームと一致するか
    ///
    /// プライベートルームは DM の宛先なので、本人以外が参加・送信してはいけません。
    pub async fn is_private_room(&self, room: &RoomName) -> bool {
        self.rooms
            .read()
            .await
            .keys()
            .any(|connection_id| room.is_private_for(connection_id))
    }

    /// ルームに参加中の接続 ID のスナップショット
    pub async fn connections_in(&self, room: &RoomName) -> Vec<ConnectionId> {
        let rooms = self.rooms.read().await;
        let mut connections: Vec<ConnectionId> = rooms
            .iter()
            .filter(|(_, joined)| joined.contains(room))
            .map(|(id, _)| id.clone())
            .collect();
        connections.sort();
        connections
    }
}
