//! Identity Registry
//!
//! 接続中のクライアントと表示名の対応表。
//! 表示名はオンライン中のクライアント間で大文字小文字を区別せず一意です。

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::{ConnectionId, DisplayName, Identity, ValueObjectError};

/// 表示名の登録に失敗した理由
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// 表示名が空、または長すぎる
    #[error(transparent)]
    InvalidName(#[from] ValueObjectError),

    /// 同じ表示名（大文字小文字を区別しない）のクライアントが接続中
    #[error("name already in use")]
    NameInUse(String),
}

/// 接続 ID → Identity のレジストリ
#[derive(Default)]
pub struct IdentityRegistry {
    identities: RwLock<HashMap<ConnectionId, Identity>>,
}

impl IdentityRegistry {
    /// 新しい IdentityRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 表示名を登録する
    ///
    /// 重複チェックと挿入は同じ書き込みロックの中で行うため、
    /// 同名の同時登録はちょうど 1 件だけが成功します。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 登録する接続
    /// * `requested_name` - クライアントが指定した表示名（前後の空白は除去される）
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - 登録成功
    /// * `Err(RegistryError)` - 表示名が不正、または使用中
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        requested_name: &str,
    ) -> Result<Identity, RegistryError> {
        let display_name = DisplayName::new(requested_name)?;

        let mut identities = self.identities.write().await;
        if identities
            .values()
            .any(|identity| identity.display_name.eq_ignore_case(&display_name))
        {
            return Err(RegistryError::NameInUse(display_name.into_string()));
        }

        let identity = Identity::new(connection_id.clone(), display_name);
        identities.insert(connection_id, identity.clone());
        Ok(identity)
    }

    /// 接続 ID から Identity を取得
    pub async fn lookup(&self, connection_id: &ConnectionId) -> Option<Identity> {
        self.identities.read().await.get(connection_id).cloned()
    }

    /// Identity を削除する。存在しない場合は何もしない
    pub async fn remove(&self, connection_id: &ConnectionId) -> Option<Identity> {
        self.identities.write().await.remove(connection_id)
    }

    /// 全 Identity のスナップショット（表示名順）
    pub async fn list(&self) -> Vec<Identity> {
        let mut identities: Vec<Identity> =
            self.identities.read().await.values().cloned().collect();
        identities.sort_by(|a, b| {
            a.display_name
                .as_str()
                .cmp(b.display_name.as_str())
                .then_with(|| a.connection_id.cmp(&b.connection_id))
        });
        identities
    }

    /// 登録数
    #[cfg(test)]
    pub async fn count(&self) -> usize {
        self.identities.read().await.len()
    }
}
