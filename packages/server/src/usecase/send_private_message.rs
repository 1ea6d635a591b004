//! UseCase: ダイレクトメッセージ送信処理
//!
//! 宛先は接続中（IdentityRegistry に登録済み）でなければなりません。
//! 保存に成功したメッセージを送信者にエコーし、宛先の接続にだけ配送します。

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionId, Identity, Message, MessageContent, MessageRepository, NewMessage, Timestamp,
        ValueObjectError,
    },
    infrastructure::{
        ConnectionHub, IdentityRegistry,
        dto::{http::MessageDto, websocket::ServerEvent},
    },
};

use super::error::ChatError;

/// ダイレクトメッセージ送信のユースケース
pub struct SendPrivateMessageUseCase {
    identities: Arc<IdentityRegistry>,
    hub: Arc<ConnectionHub>,
    messages: Arc<dyn MessageRepository>,
}

impl SendPrivateMessageUseCase {
    /// 新しい SendPrivateMessageUseCase を作成
    pub fn new(
        identities: Arc<IdentityRegistry>,
        hub: Arc<ConnectionHub>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            identities,
            hub,
            messages,
        }
    }

    /// ダイレクトメッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `author` - 送信者（登録済み）
    /// * `to` - 宛先のユーザー ID
    /// * `content` - メッセージ内容
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Message))` - 保存・配送したメッセージ
    /// * `Ok(None)` - 空のメッセージのため何もしなかった
    /// * `Err(ChatError)` - 宛先なし・宛先オフライン・保存失敗
    pub async fn execute(
        &self,
        author: &Identity,
        to: &str,
        content: &str,
    ) -> Result<Option<Message>, ChatError> {
        // 1. 宛先の解決
        let recipient_id = match ConnectionId::new(to) {
            Ok(id) => id,
            Err(ValueObjectError::ConnectionIdEmpty) => return Err(ChatError::missing_recipient()),
            Err(_) => return Err(ChatError::recipient_offline()),
        };
        let Some(recipient) = self.identities.lookup(&recipient_id).await else {
            tracing::debug!(
                "Private message from '{}' to offline user '{}'",
                author.user_id(),
                recipient_id
            );
            return Err(ChatError::recipient_offline());
        };

        let content = match MessageContent::new(content) {
            Ok(content) => content,
            Err(ValueObjectError::MessageContentEmpty) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // 2. 永続化
        let message = self
            .messages
            .create(NewMessage::direct(author, &recipient, content, Timestamp::now()))
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to persist private message from '{}': {}",
                    author.user_id(),
                    e
                );
                ChatError::save_failed()
            })?;

        // 3. 送信者へのエコーと宛先への配送
        let event = ServerEvent::Private(MessageDto::from(&message));
        self.hub.send_to(author.user_id(), &event).await;
        self.hub.send_to(recipient.user_id(), &event).await;

        Ok(Some(message))
    }
}
