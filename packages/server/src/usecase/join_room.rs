//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 初回参加時の表示名登録、参加履歴の upsert、参加者への初期イベント送信
//!
//! ### なぜこのテストが必要か
//! - 表示名の重複時に状態が一切変わらないことを保証
//! - 参加履歴が (room, user_id) ごとに 1 行に保たれることを保証
//! - 参加者が joined / users / groups / joined:rooms を順に受け取ることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：初回参加、2 つ目のルームへの参加、ロビーへの参加
//! - 異常系：表示名の重複・空の表示名
//! - エッジケース：参加履歴の保存失敗（参加自体は成功する）

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionId, GroupRepository, Identity, NewRoomMember, RepositoryError, RoomMember,
        RoomMemberRepository, RoomName, Timestamp,
    },
    infrastructure::{
        ConnectionHub, IdentityRegistry, RoomMembershipTracker,
        dto::{
            http::GroupDto,
            websocket::{JoinedPayload, ServerEvent},
        },
    },
};

use super::{error::ChatError, roster::RosterBuilder};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    identities: Arc<IdentityRegistry>,
    rooms: Arc<RoomMembershipTracker>,
    hub: Arc<ConnectionHub>,
    members: Arc<dyn RoomMemberRepository>,
    groups: Arc<dyn GroupRepository>,
    roster: RosterBuilder,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        identities: Arc<IdentityRegistry>,
        rooms: Arc<RoomMembershipTracker>,
        hub: Arc<ConnectionHub>,
        members: Arc<dyn RoomMemberRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        let roster = RosterBuilder::new(
            members.clone(),
            rooms.clone(),
            identities.clone(),
            hub.clone(),
        );
        Self {
            identities,
            rooms,
            hub,
            members,
            groups,
            roster,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続
    /// * `current` - 登録済みの Identity（未登録なら `None`）
    /// * `room` - 参加するルーム名（空ならロビー）
    /// * `name` - 未登録の場合に登録する表示名
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - 参加成功（新規登録の場合は登録された Identity）
    /// * `Err(ChatError)` - 表示名の重複・不正、ルーム名の不正、
    ///   プライベートルームへの参加（状態は変化しない）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        current: Option<Identity>,
        room: Option<&str>,
        name: &str,
    ) -> Result<Identity, ChatError> {
        let room = RoomName::or_lobby(room)?;
        if self.rooms.is_private_room(&room).await {
            return Err(ChatError::room_unavailable());
        }

        // 1. 未登録なら表示名を登録し、全接続にユーザー一覧を配信
        let identity = match current {
            Some(identity) => identity,
            None => {
                let identity = self
                    .identities
                    .register(connection_id.clone(), name)
                    .await?;
                tracing::info!(
                    "Connection '{}' registered as '{}'",
                    connection_id,
                    identity.display_name
                );
                let users = self.identities.list().await;
                self.hub.send_to_all(&ServerEvent::users(&users)).await;
                identity
            }
        };

        // 2. 揮発性の参加状態を更新
        self.rooms.join(connection_id, room.clone()).await;

        // 3. 参加履歴を upsert（ロビーは記録しない）
        if !room.is_lobby()
            && let Err(e) = self.upsert_member(&room, &identity).await
        {
            tracing::error!(
                "Failed to save room member '{}' in '{}': {}",
                identity.user_id(),
                room,
                e
            );
        }

        tracing::info!("Connection '{}' joined room '{}'", connection_id, room);

        // 4. 参加者本人への初期イベント
        self.send_initial_state(connection_id, &identity, &room)
            .await;

        // 5. ルームの名簿を配信
        self.roster.broadcast(&room).await;

        Ok(identity)
    }

    /// `(room, user_id)` の行を作成、または表示名が変わっていれば更新
    async fn upsert_member(
        &self,
        room: &RoomName,
        identity: &Identity,
    ) -> Result<RoomMember, RepositoryError> {
        match self.members.find(room, identity.user_id()).await? {
            None => {
                self.members
                    .create(NewRoomMember {
                        room: room.clone(),
                        user_id: identity.user_id().clone(),
                        user_name: identity.display_name.clone(),
                        joined_at: Timestamp::now(),
                    })
                    .await
            }
            Some(existing) if existing.user_name != identity.display_name => {
                self.members
                    .update_name(existing.id, identity.display_name.clone())
                    .await
            }
            Some(existing) => Ok(existing),
        }
    }

    async fn send_initial_state(
        &self,
        connection_id: &ConnectionId,
        identity: &Identity,
        room: &RoomName,
    ) {
        let joined = ServerEvent::Joined(JoinedPayload {
            room: room.as_str().to_string(),
            name: identity.display_name.as_str().to_string(),
            user_id: identity.user_id().as_str().to_string(),
        });
        self.hub.send_to(connection_id, &joined).await;

        let users = self.identities.list().await;
        self.hub
            .send_to(connection_id, &ServerEvent::users(&users))
            .await;

        match self.groups.list().await {
            Ok(groups) => {
                let groups = groups.iter().map(GroupDto::from).collect();
                self.hub
                    .send_to(connection_id, &ServerEvent::Groups(groups))
                    .await;
            }
            Err(e) => tracing::warn!("Failed to load groups: {}", e),
        }

        let mut joined_rooms: Vec<String> = self
            .rooms
            .rooms_of(connection_id)
            .await
            .into_iter()
            .filter(|r| !r.is_private_for(connection_id))
            .map(RoomName::into_string)
            .collect();
        joined_rooms.sort();
        self.hub
            .send_to(connection_id, &ServerEvent::JoinedRooms(joined_rooms))
            .await;
    }
}
