//! UseCase: グループ状態の更新処理（UpdateScore / UpdateTimer / UpdateRound）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateGroupStateUseCase::execute() メソッド
//! - フィールドグループ単位の更新と、グループ全体へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 更新対象外のフィールドが変化しないことを保証
//! - 存在しない（または回収済みの）グループへの更新が何も起こさないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：Score / Timer / Round の更新とブロードキャスト
//! - 異常系：未知のグループ、空のグループ名

use std::sync::Arc;

use crate::domain::{GroupEvent, GroupName, GroupState, GroupStateRepository, GroupStateUpdate};

use super::{dispatcher::BroadcastDispatcher, error::UpdateGroupError};

/// グループ状態更新のユースケース
pub struct UpdateGroupStateUseCase {
    groups: Arc<dyn GroupStateRepository>,
    dispatcher: Arc<BroadcastDispatcher>,
}

impl UpdateGroupStateUseCase {
    pub fn new(groups: Arc<dyn GroupStateRepository>, dispatcher: Arc<BroadcastDispatcher>) -> Self {
        Self { groups, dispatcher }
    }

    /// 更新を実行し、同じ値をグループの所属接続全員にブロードキャストする
    ///
    /// ブロードキャストは状態のロックを解放した後に行われる。
    ///
    /// # Returns
    ///
    /// * `Ok(GroupState)` - 更新後のスナップショット
    /// * `Err(UpdateGroupError)` - 何も適用されず、何も送信されない
    pub async fn execute(
        &self,
        group_name: &str,
        update: GroupStateUpdate,
    ) -> Result<GroupState, UpdateGroupError> {
        let group = GroupName::new(group_name.to_string())?;

        let state = self
            .groups
            .update(&group, update)
            .await
            .map_err(|_| UpdateGroupError::NotFound(group.as_str().to_string()))?;

        self.dispatcher
            .to_group(&group, &GroupEvent::from(update))
            .await;

        Ok(state)
    }
}
