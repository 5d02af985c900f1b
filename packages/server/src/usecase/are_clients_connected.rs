//! UseCase: グループに接続中のクライアントがいるかの問い合わせ（AreClientsConnected）

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, GroupEvent, GroupName};

use super::dispatcher::BroadcastDispatcher;

pub struct AreClientsConnectedUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    dispatcher: Arc<BroadcastDispatcher>,
}

impl AreClientsConnectedUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, dispatcher: Arc<BroadcastDispatcher>) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }

    /// グループに 1 つ以上の接続が所属していれば `true`
    ///
    /// 不正なグループ名と未知のグループは `false`。状態は変更しない。
    pub async fn execute(&self, group_name: &str) -> bool {
        match GroupName::new(group_name.to_string()) {
            Ok(group) => self.registry.connection_count(&group).await > 0,
            Err(_) => false,
        }
    }

    /// 問い合わせ結果を `ClientsConnected` イベントとして呼び出し元に返す
    pub async fn reply_to(&self, caller: &ConnectionId, group_name: &str) -> bool {
        let connected = self.execute(group_name).await;
        self.dispatcher
            .to_caller(
                caller,
                &GroupEvent::ClientsConnected {
                    group_name: group_name.to_string(),
                    connected,
                },
            )
            .await;
        connected
    }
}
