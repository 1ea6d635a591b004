//! UseCase 層のエラー定義
//!
//! `Display` の文字列はそのまま `error` イベントとしてクライアントに送られます。

use thiserror::Error;

use crate::{domain::ValueObjectError, infrastructure::RegistryError};

/// 送信元の接続にだけ通知されるエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// 入力が不正（空の表示名・宛先、不正なペイロードなど）
    #[error("{0}")]
    Validation(String),

    /// 表示名の重複
    #[error("{0}")]
    Conflict(String),

    /// 宛先がオフライン
    #[error("{0}")]
    NotFound(String),

    /// 永続化の失敗
    #[error("{0}")]
    Persistence(String),
}

impl ChatError {
    pub fn not_identified() -> Self {
        Self::Validation("join a room first".to_string())
    }

    /// 未登録のままダイレクトメッセージを送ろうとした
    pub fn not_joined() -> Self {
        Self::Validation("join first".to_string())
    }

    /// 他の接続のプライベートルームへの参加・送信
    pub fn room_unavailable() -> Self {
        Self::Validation("room not available".to_string())
    }

    pub fn missing_recipient() -> Self {
        Self::Validation("missing recipient".to_string())
    }

    pub fn recipient_offline() -> Self {
        Self::NotFound("user offline".to_string())
    }

    pub fn malformed_payload() -> Self {
        Self::Validation("malformed payload".to_string())
    }

    pub fn save_failed() -> Self {
        Self::Persistence("unable to save message".to_string())
    }
}

impl From<ValueObjectError> for ChatError {
    fn from(e: ValueObjectError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<RegistryError> for ChatError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::InvalidName(e) => e.into(),
            RegistryError::NameInUse(_) => Self::Conflict(e.to_string()),
        }
    }
}
