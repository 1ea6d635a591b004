//! UseCase: メッセージ送信処理（ルーム宛て）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 永続化してから配送する順序（persist-before-deliver）
//!
//! ### なぜこのテストが必要か
//! - 保存に失敗したメッセージが配送されないことを保証
//! - 配送先がルームの現在の参加者に限られることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム参加者への配送
//! - 異常系：保存失敗、他の接続のプライベートルーム宛て
//! - エッジケース：空白のみのメッセージ（黙って破棄）、送信後に参加した接続

use std::sync::Arc;

use crate::{
    domain::{
        Identity, Message, MessageContent, MessageRepository, NewMessage, RoomName, Timestamp,
        ValueObjectError,
    },
    infrastructure::{
        ConnectionHub, RoomMembershipTracker,
        dto::{http::MessageDto, websocket::ServerEvent},
    },
};

use super::error::ChatError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    rooms: Arc<RoomMembershipTracker>,
    hub: Arc<ConnectionHub>,
    messages: Arc<dyn MessageRepository>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        rooms: Arc<RoomMembershipTracker>,
        hub: Arc<ConnectionHub>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            rooms,
            hub,
            messages,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `author` - 送信者（登録済み）
    /// * `room` - 宛先ルーム（空ならロビー）
    /// * `content` - メッセージ内容
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Message))` - 保存・配送したメッセージ
    /// * `Ok(None)` - 空のメッセージのため何もしなかった
    /// * `Err(ChatError)` - 入力不正、他の接続のプライベートルーム宛て、
    ///   または保存失敗（配送は行わない）
    pub async fn execute(
        &self,
        author: &Identity,
        room: Option<&str>,
        content: &str,
    ) -> Result<Option<Message>, ChatError> {
        let room = RoomName::or_lobby(room)?;
        if self.rooms.is_private_room(&room).await {
            return Err(ChatError::room_unavailable());
        }
        let content = match MessageContent::new(content) {
            Ok(content) => content,
            Err(ValueObjectError::MessageContentEmpty) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // 1. 永続化
        let message = self
            .messages
            .create(NewMessage::room(author, room.clone(), content, Timestamp::now()))
            .await
            .map_err(|e| {
                tracing::error!("Failed to persist message from '{}': {}", author.user_id(), e);
                ChatError::save_failed()
            })?;

        // 2. 保存できたものだけをルームの参加者へ配送
        let delivered = self
            .hub
            .send_to_room(&room, &ServerEvent::Chat(MessageDto::from(&message)))
            .await;
        tracing::debug!(
            "Delivered message {} in '{}' to {} connections",
            message.id,
            room,
            delivered
        );

        Ok(Some(message))
    }
}
