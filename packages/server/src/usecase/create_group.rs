//! UseCase: グループ作成処理
//!
//! 保存に成功したグループだけを `group:created` として全接続に配信します。

use std::sync::Arc;

use crate::{
    domain::{Group, GroupName, GroupRepository, Timestamp},
    infrastructure::{
        ConnectionHub,
        dto::{http::GroupDto, websocket::ServerEvent},
    },
};

use super::error::ChatError;

/// グループ作成のユースケース
pub struct CreateGroupUseCase {
    groups: Arc<dyn GroupRepository>,
    hub: Arc<ConnectionHub>,
}

impl CreateGroupUseCase {
    /// 新しい CreateGroupUseCase を作成
    pub fn new(groups: Arc<dyn GroupRepository>, hub: Arc<ConnectionHub>) -> Self {
        Self { groups, hub }
    }

    /// グループ作成を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Group)` - 作成したグループ
    /// * `Err(ChatError::Validation)` - グループ名が空、または長すぎる
    /// * `Err(ChatError::Persistence)` - 保存に失敗（配信は行わない）
    pub async fn execute(&self, name: &str) -> Result<Group, ChatError> {
        let name = GroupName::new(name)?;

        let group = self
            .groups
            .create(name, Timestamp::now())
            .await
            .map_err(|e| {
                tracing::error!("Failed to create group: {}", e);
                ChatError::Persistence("unable to create group".to_string())
            })?;

        let notified = self
            .hub
            .send_to_all(&ServerEvent::GroupCreated(GroupDto::from(&group)))
            .await;
        tracing::info!(
            "Group '{}' created, notified {} connections",
            group.name.as_str(),
            notified
        );

        Ok(group)
    }
}
