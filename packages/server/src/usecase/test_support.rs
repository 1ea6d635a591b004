//! UseCase テスト用の共通セットアップ

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{
    domain::{ConnectionId, RoomName},
    infrastructure::{
        ConnectionHub, IdentityRegistry, RoomMembershipTracker,
        dto::websocket::ServerEvent,
        repository::{InMemoryGroupRepository, InMemoryMessageRepository, InMemoryRoomMemberRepository},
    },
};

pub struct Fixture {
    pub identities: Arc<IdentityRegistry>,
    pub rooms: Arc<RoomMembershipTracker>,
    pub hub: Arc<ConnectionHub>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub members: Arc<InMemoryRoomMemberRepository>,
    pub groups: Arc<InMemoryGroupRepository>,
}

impl Fixture {
    pub fn new() -> Self {
        let rooms = Arc::new(RoomMembershipTracker::new());
        Self {
            identities: Arc::new(IdentityRegistry::new()),
            hub: Arc::new(ConnectionHub::new(rooms.clone())),
            rooms,
            messages: Arc::new(InMemoryMessageRepository::new()),
            members: Arc::new(InMemoryRoomMemberRepository::new()),
            groups: Arc::new(InMemoryGroupRepository::new()),
        }
    }

    /// 接続を確立し（送信チャンネル登録 + プライベートルーム参加）、受信側を返す
    pub async fn connect(&self, id: &str) -> (ConnectionId, UnboundedReceiver<String>) {
        let connection_id = conn(id);
        let (tx, rx) = mpsc::unbounded_channel();
        self.hub.attach(connection_id.clone(), tx).await;
        self.rooms
            .join(&connection_id, RoomName::private_for(&connection_id))
            .await;
        (connection_id, rx)
    }
}

pub fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id).unwrap()
}

pub fn room(name: &str) -> RoomName {
    RoomName::new(name).unwrap()
}

/// 受信済みのイベントをすべて取り出す
pub fn drain(rx: &mut UnboundedReceiver<String>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(json) = rx.try_recv() {
        events.push(serde_json::from_str(&json).unwrap());
    }
    events
}
