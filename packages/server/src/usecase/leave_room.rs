//! UseCase: ルーム退出処理

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, RoomMemberRepository, RoomName},
    infrastructure::{ConnectionHub, IdentityRegistry, RoomMembershipTracker},
};

use super::{error::ChatError, roster::RosterBuilder};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    rooms: Arc<RoomMembershipTracker>,
    roster: RosterBuilder,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(
        identities: Arc<IdentityRegistry>,
        rooms: Arc<RoomMembershipTracker>,
        hub: Arc<ConnectionHub>,
        members: Arc<dyn RoomMemberRepository>,
    ) -> Self {
        let roster = RosterBuilder::new(members, rooms.clone(), identities, hub);
        Self { rooms, roster }
    }

    /// ルーム退出を実行
    ///
    /// 空のルーム名とプライベートルーム（自身・他の接続とも）は無視します。
    /// 参加していないルームからの退出もエラーにはなりません。
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 退出した
    /// * `Ok(false)` - 何もしなかった
    /// * `Err(ChatError)` - ルーム名が不正
    pub async fn execute(&self, connection_id: &ConnectionId, room: &str) -> Result<bool, ChatError> {
        if room.trim().is_empty() {
            return Ok(false);
        }
        let room = RoomName::new(room)?;
        if self.rooms.is_private_room(&room).await {
            return Ok(false);
        }

        let left = self.rooms.leave(connection_id, &room).await;
        tracing::info!("Connection '{}' left room '{}'", connection_id, room);

        self.roster.broadcast(&room).await;

        Ok(left)
    }
}
