//! UseCase: グループ離脱処理（LeaveGroup）

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, GroupName};

use super::error::LeaveGroupError;

/// グループ離脱のユースケース
///
/// 所属だけを削除する。状態の保持は所属とは独立しており、最後の接続が離脱しても状態は残る。
pub struct LeaveGroupUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl LeaveGroupUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// グループ離脱を実行
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 所属していた接続を削除した
    /// * `Ok(false)` - 所属していなかった（何もしない）
    pub async fn execute(
        &self,
        connection: &ConnectionId,
        group_name: &str,
    ) -> Result<bool, LeaveGroupError> {
        let group = GroupName::new(group_name.to_string())?;
        let removed = self.registry.leave(connection, &group).await;
        if removed {
            tracing::info!("Connection '{}' left group '{}'", connection, group);
        }
        Ok(removed)
    }
}
