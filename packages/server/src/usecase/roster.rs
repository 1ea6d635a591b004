//! UseCase: ルーム名簿の構築と配信
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RosterBuilder::roster() / broadcast()
//! - 永続化された参加履歴とオンライン状態のマージ
//!
//! ### なぜこのテストが必要か
//! - 過去に参加したオフラインのユーザーも名簿に残ることを保証
//! - 再参加でオンラインに切り替わり、行が重複しないことを保証
//! - ストアの読み取り失敗で接続処理が落ちないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：オンライン／オフラインの混在
//! - エッジケース：ロビー（名簿なし）、行の無いオンラインユーザー
//! - 異常系：ストアの読み取り失敗

use std::{collections::HashSet, sync::Arc};

use crate::{
    domain::{ConnectionId, RoomMemberRepository, RoomName, RosterEntry},
    infrastructure::{
        ConnectionHub, IdentityRegistry, RoomMembershipTracker,
        dto::websocket::{RoomMemberDto, RoomMembersPayload, ServerEvent},
    },
};

/// 名簿の構築
pub struct RosterBuilder {
    members: Arc<dyn RoomMemberRepository>,
    rooms: Arc<RoomMembershipTracker>,
    identities: Arc<IdentityRegistry>,
    hub: Arc<ConnectionHub>,
}

impl RosterBuilder {
    /// 新しい RosterBuilder を作成
    pub fn new(
        members: Arc<dyn RoomMemberRepository>,
        rooms: Arc<RoomMembershipTracker>,
        identities: Arc<IdentityRegistry>,
        hub: Arc<ConnectionHub>,
    ) -> Self {
        Self {
            members,
            rooms,
            identities,
            hub,
        }
    }

    /// ルームの名簿を構築する
    ///
    /// 1. ロビーは名簿を持たない（空を返す）
    /// 2. 永続化された参加履歴を全件読む
    /// 3. ルームに参加中の接続を Identity に解決してオンライン集合を作る
    /// 4. 各行のユーザーがオンライン集合に含まれるかで `is_online` を決める
    ///
    /// 参加履歴の読み取りに失敗した場合は空の名簿を返します。
    pub async fn roster(&self, room: &RoomName) -> Vec<RosterEntry> {
        if room.is_lobby() {
            return Vec::new();
        }

        let rows = match self.members.list_by_room(room).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Failed to load room members of '{}': {}", room, e);
                return Vec::new();
            }
        };

        let online = self.online_user_ids(room).await;

        rows.into_iter()
            .map(|row| RosterEntry {
                is_online: online.contains(&row.user_id),
                user_id: row.user_id,
                display_name: row.user_name,
            })
            .collect()
    }

    /// 名簿を構築し、ルームに参加中の全接続へ `room:members` を配信する
    ///
    /// # Returns
    ///
    /// 配信できた接続数（ロビーは常に 0）
    pub async fn broadcast(&self, room: &RoomName) -> usize {
        if room.is_lobby() {
            return 0;
        }

        let members = self.roster(room).await;
        let event = ServerEvent::RoomMembers(RoomMembersPayload {
            room: room.as_str().to_string(),
            members: members.iter().map(RoomMemberDto::from).collect(),
        });
        let delivered = self.hub.send_to_room(room, &event).await;
        tracing::debug!(
            "Broadcasted room:members for '{}' ({} members) to {} connections",
            room,
            members.len(),
            delivered
        );
        delivered
    }

    async fn online_user_ids(&self, room: &RoomName) -> HashSet<ConnectionId> {
        let mut online = HashSet::new();
        for connection_id in self.rooms.connections_in(room).await {
            if let Some(identity) = self.identities.lookup(&connection_id).await {
                online.insert(identity.user_id().clone());
            }
        }
        online
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            DisplayName, MockRoomMemberRepository, NewRoomMember, RepositoryError, Timestamp,
        },
        usecase::test_support::{Fixture, conn, drain, room},
    };

    fn builder(f: &Fixture) -> RosterBuilder {
        RosterBuilder::new(
            f.members.clone(),
            f.rooms.clone(),
            f.identities.clone(),
            f.hub.clone(),
        )
    }

    async fn persist_member(f: &Fixture, room_name: &str, user_id: &str, name: &str) {
        f.members
            .create(NewRoomMember {
                room: room(room_name),
                user_id: conn(user_id),
                user_name: DisplayName::new(name).unwrap(),
                joined_at: Timestamp::new(1000),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_roster_marks_offline_members() {
        // テスト項目: 参加履歴があり接続していないユーザーは is_online=false で含まれる
        // given (前提条件):
        let f = Fixture::new();
        persist_member(&f, "rust", "a1", "Alice").await;

        // when (操作):
        let roster = builder(&f).roster(&room("rust")).await;

        // then (期待する結果):
        assert_eq!(
            roster,
            vec![RosterEntry {
                user_id: conn("a1"),
                display_name: DisplayName::new("Alice").unwrap(),
                is_online: false,
            }]
        );
    }

    #[tokio::test]
    async fn test_roster_flips_online_without_duplicates() {
        // テスト項目: オフラインだったユーザーが接続・参加すると is_online=true に変わり、行は増えない
        // given (前提条件):
        let f = Fixture::new();
        persist_member(&f, "rust", "a1", "Alice").await;
        persist_member(&f, "rust", "b2", "Bob").await;
        let roster_builder = builder(&f);
        assert!(roster_builder.roster(&room("rust")).await.iter().all(|e| !e.is_online));

        // when (操作): a1 が接続してルームに参加
        f.identities.register(conn("a1"), "Alice").await.unwrap();
        f.rooms.join(&conn("a1"), room("rust")).await;
        let roster = roster_builder.roster(&room("rust")).await;

        // then (期待する結果):
        assert_eq!(roster.len(), 2);
        let alice = roster.iter().find(|e| e.user_id == conn("a1")).unwrap();
        let bob = roster.iter().find(|e| e.user_id == conn("b2")).unwrap();
        assert!(alice.is_online);
        assert!(!bob.is_online);
    }

    #[tokio::test]
    async fn test_roster_online_elsewhere_is_offline_here() {
        // テスト項目: 別ルームにだけ参加中のユーザーはこのルームではオフライン扱い
        // given (前提条件):
        let f = Fixture::new();
        persist_member(&f, "rust", "a1", "Alice").await;
        f.identities.register(conn("a1"), "Alice").await.unwrap();
        f.rooms.join(&conn("a1"), room("go")).await;

        // when (操作):
        let roster = builder(&f).roster(&room("rust")).await;

        // then (期待する結果):
        assert!(!roster[0].is_online);
    }

    #[tokio::test]
    async fn test_roster_skips_online_user_without_row() {
        // テスト項目: 参加履歴の無いオンラインユーザーは名簿に含まれない
        // given (前提条件):
        let f = Fixture::new();
        f.identities.register(conn("a1"), "Alice").await.unwrap();
        f.rooms.join(&conn("a1"), room("rust")).await;

        // when (操作):
        let roster = builder(&f).roster(&room("rust")).await;

        // then (期待する結果):
        assert!(roster.is_empty());
    }

    #[tokio::test]
    async fn test_roster_of_lobby_is_empty() {
        // テスト項目: ロビーは名簿を持たない
        // given (前提条件):
        let f = Fixture::new();
        persist_member(&f, "general", "a1", "Alice").await;

        // when (操作):
        let roster = builder(&f).roster(&RoomName::lobby()).await;

        // then (期待する結果):
        assert!(roster.is_empty());
    }

    #[tokio::test]
    async fn test_roster_degrades_on_store_failure() {
        // テスト項目: 参加履歴の読み取りに失敗しても空の名簿が返される
        // given (前提条件):
        let f = Fixture::new();
        let mut members = MockRoomMemberRepository::new();
        members
            .expect_list_by_room()
            .returning(|_| Err(RepositoryError::Unavailable("disk gone".to_string())));
        let roster_builder = RosterBuilder::new(
            Arc::new(members),
            f.rooms.clone(),
            f.identities.clone(),
            f.hub.clone(),
        );

        // when (操作):
        let roster = roster_builder.roster(&room("rust")).await;

        // then (期待する結果):
        assert!(roster.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_room_members_only() {
        // テスト項目: room:members はルーム参加中の接続にだけ配信される
        // given (前提条件):
        let f = Fixture::new();
        let (a1, mut rx_a) = f.connect("a1").await;
        let (_b2, mut rx_b) = f.connect("b2").await;
        f.identities.register(a1.clone(), "Alice").await.unwrap();
        f.rooms.join(&a1, room("rust")).await;
        persist_member(&f, "rust", "a1", "Alice").await;

        // when (操作):
        let delivered = builder(&f).broadcast(&room("rust")).await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        let events = drain(&mut rx_a);
        assert_eq!(
            events,
            vec![ServerEvent::RoomMembers(RoomMembersPayload {
                room: "rust".to_string(),
                members: vec![RoomMemberDto {
                    id: "a1".to_string(),
                    name: "Alice".to_string(),
                    is_online: true,
                }],
            })]
        );
        assert!(drain(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_skips_lobby() {
        // テスト項目: ロビーには room:members を配信しない
        // given (前提条件):
        let f = Fixture::new();
        let (a1, mut rx_a) = f.connect("a1").await;
        f.rooms.join(&a1, RoomName::lobby()).await;

        // when (操作):
        let delivered = builder(&f).broadcast(&RoomName::lobby()).await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
        assert!(drain(&mut rx_a).is_empty());
    }
}
