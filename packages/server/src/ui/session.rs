//! Per-connection event dispatch.
//!
//! 1 つの WebSocket 接続の状態（Connected → Identified → Disconnected）を保持し、
//! 受信したイベントを UseCase に振り分けます。
//! 読み取りループが唯一の呼び出し元なので、イベントは到着順に 1 つずつ処理されます。

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    domain::{ConnectionId, Identity},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::state::AppState,
    usecase::{
        ChatError, ConnectParticipantUseCase, DisconnectParticipantUseCase, JoinRoomUseCase,
        LeaveRoomUseCase, SendMessageUseCase, SendPrivateMessageUseCase,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    /// 接続済み・表示名未登録
    Connected,
    /// 表示名登録済み
    Identified(Identity),
    Disconnected,
}

/// 1 接続分のセッション
pub struct ConnectionSession {
    app: AppState,
    connection_id: ConnectionId,
    state: SessionState,
}

impl ConnectionSession {
    /// 接続を確立し、セッションを開始
    pub async fn open(app: AppState, sender: UnboundedSender<String>) -> Result<Self, ChatError> {
        let connection_id = ConnectParticipantUseCase::new(app.rooms.clone(), app.hub.clone())
            .execute(sender)
            .await?;
        tracing::info!("Connection '{}' opened", connection_id);

        Ok(Self {
            app,
            connection_id,
            state: SessionState::Connected,
        })
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    /// 登録済みの Identity
    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Identified(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Disconnected
    }

    /// テキストフレームを処理
    pub async fn handle_text(&mut self, text: &str) {
        if self.is_closed() {
            return;
        }
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => self.handle(event).await,
            Err(e) => {
                tracing::warn!(
                    "Malformed payload from '{}': {}",
                    self.connection_id,
                    e
                );
                self.report(&ChatError::malformed_payload()).await;
            }
        }
    }

    /// イベントを処理
    ///
    /// エラーはこの接続にだけ `error` イベントとして返し、接続は維持します。
    pub async fn handle(&mut self, event: ClientEvent) {
        if self.is_closed() {
            tracing::debug!(
                "Ignoring event from closed connection '{}'",
                self.connection_id
            );
            return;
        }
        if let Err(e) = self.dispatch(event).await {
            tracing::debug!("Event from '{}' rejected: {}", self.connection_id, e);
            self.report(&e).await;
        }
    }

    async fn dispatch(&mut self, event: ClientEvent) -> Result<(), ChatError> {
        match event {
            ClientEvent::Join(payload) => {
                let identity = JoinRoomUseCase::new(
                    self.app.identities.clone(),
                    self.app.rooms.clone(),
                    self.app.hub.clone(),
                    self.app.members.clone(),
                    self.app.groups.clone(),
                )
                .execute(
                    &self.connection_id,
                    self.identity().cloned(),
                    payload.room.as_deref(),
                    &payload.name,
                )
                .await?;
                self.state = SessionState::Identified(identity);
            }
            ClientEvent::Chat(payload) => {
                let author = self.identity().ok_or_else(ChatError::not_identified)?;
                SendMessageUseCase::new(
                    self.app.rooms.clone(),
                    self.app.hub.clone(),
                    self.app.messages.clone(),
                )
                .execute(author, payload.room.as_deref(), &payload.content)
                .await?;
            }
            ClientEvent::Private(payload) => {
                let author = self.identity().ok_or_else(ChatError::not_joined)?;
                SendPrivateMessageUseCase::new(
                    self.app.identities.clone(),
                    self.app.hub.clone(),
                    self.app.messages.clone(),
                )
                .execute(author, &payload.to, &payload.content)
                .await?;
            }
            ClientEvent::Leave(room) => {
                LeaveRoomUseCase::new(
                    self.app.identities.clone(),
                    self.app.rooms.clone(),
                    self.app.hub.clone(),
                    self.app.members.clone(),
                )
                .execute(&self.connection_id, &room)
                .await?;
            }
        }
        Ok(())
    }

    /// 切断処理（2 回目以降は何もしない）
    pub async fn close(&mut self, reason: &str) {
        if self.is_closed() {
            return;
        }
        self.state = SessionState::Disconnected;

        let rooms = DisconnectParticipantUseCase::new(
            self.app.identities.clone(),
            self.app.rooms.clone(),
            self.app.hub.clone(),
            self.app.members.clone(),
        )
        .execute(&self.connection_id)
        .await;
        tracing::info!(
            "Connection '{}' closed ({}), left {} rooms",
            self.connection_id,
            reason,
            rooms.len()
        );
    }

    async fn report(&self, error: &ChatError) {
        self.app
            .hub
            .send_to(&self.connection_id, &ServerEvent::error(error.to_string()))
            .await;
    }
}
