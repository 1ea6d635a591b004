//! UseCase: 参加者接続処理
//!
//! 接続直後はまだ表示名を持たない（Connected 状態）ため、
//! 送信チャンネルの登録とプライベートルームへの参加だけを行います。
//! クライアントへは何も送信しません。

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, RoomName},
    infrastructure::{ConnectionHub, RoomMembershipTracker},
};

use super::error::ChatError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    rooms: Arc<RoomMembershipTracker>,
    hub: Arc<ConnectionHub>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(rooms: Arc<RoomMembershipTracker>, hub: Arc<ConnectionHub>) -> Self {
        Self { rooms, hub }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - この接続へのメッセージ送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 採番された接続 ID
    /// * `Err(ChatError)` - 接続 ID の採番に失敗
    pub async fn execute(&self, sender: UnboundedSender<String>) -> Result<ConnectionId, ChatError> {
        let connection_id = ConnectionIdFactory::generate()?;

        self.hub.attach(connection_id.clone(), sender).await;
        self.rooms
            .join(&connection_id, RoomName::private_for(&connection_id))
            .await;

        Ok(connection_id)
    }
}
