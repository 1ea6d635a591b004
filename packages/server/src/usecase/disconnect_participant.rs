//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断時のプレゼンス削除と通知（ユーザー一覧・名簿）
//!
//! ### なぜこのテストが必要か
//! - 切断した接続が名簿上でオフラインになり、参加履歴は残ることを保証
//! - 表示名が解放され、再利用できることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数ルームに参加中の接続の切断
//! - エッジケース：表示名未登録のまま切断、二重の切断

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, RoomMemberRepository, RoomName},
    infrastructure::{
        ConnectionHub, IdentityRegistry, RoomMembershipTracker, dto::websocket::ServerEvent,
    },
};

use super::roster::RosterBuilder;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    identities: Arc<IdentityRegistry>,
    rooms: Arc<RoomMembershipTracker>,
    hub: Arc<ConnectionHub>,
    roster: RosterBuilder,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        identities: Arc<IdentityRegistry>,
        rooms: Arc<RoomMembershipTracker>,
        hub: Arc<ConnectionHub>,
        members: Arc<dyn RoomMemberRepository>,
    ) -> Self {
        let roster = RosterBuilder::new(members, rooms.clone(), identities.clone(), hub.clone());
        Self {
            identities,
            rooms,
            hub,
            roster,
        }
    }

    /// 参加者切断を実行
    ///
    /// 1. 参加中ルームのエントリを削除（削除直前の集合を取得）
    /// 2. Identity を削除
    /// 3. 送信チャンネルを登録解除
    /// 4. 全接続にユーザー一覧を配信
    /// 5. 参加していた各ルーム（プライベートルームを除く）に名簿を配信
    ///
    /// # Returns
    ///
    /// 名簿を配信したルームの一覧
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<RoomName> {
        let previous_rooms = self.rooms.drop_connection(connection_id).await;
        let identity = self.identities.remove(connection_id).await;
        self.hub.detach(connection_id).await;

        if let Some(identity) = &identity {
            tracing::info!(
                "Connection '{}' ('{}') removed from registry",
                connection_id,
                identity.display_name
            );
        }

        let users = self.identities.list().await;
        self.hub.send_to_all(&ServerEvent::users(&users)).await;

        let mut rooms: Vec<RoomName> = previous_rooms
            .into_iter()
            .filter(|room| !room.is_private_for(connection_id))
            .collect();
        rooms.sort();
        for room in &rooms {
            self.roster.broadcast(room).await;
        }

        rooms
    }
}
