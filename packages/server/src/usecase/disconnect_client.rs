//! UseCase: クライアント切断処理（OnDisconnect）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 切断した接続が全てのグループから削除されること
//!
//! ### なぜこのテストが必要か
//! - 切断後の接続にブロードキャストが送られ続けないことを保証
//! - 他の接続の所属が影響を受けないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数グループに所属する接続の切断
//! - エッジケース：どのグループにも所属していない接続の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, GroupName, MessagePusher};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 切断を実行し、所属していたグループを返す
    ///
    /// 同じグループへの更新と並行に実行されても安全。状態は削除しない。
    pub async fn execute(&self, connection: &ConnectionId) -> Vec<GroupName> {
        let left = self.registry.remove_connection(connection).await;
        self.message_pusher.unregister_client(connection).await;
        tracing::info!(
            "Connection '{}' disconnected (left {} group(s))",
            connection,
            left.len()
        );
        left
    }
}
