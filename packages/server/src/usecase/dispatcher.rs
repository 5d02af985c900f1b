//! Broadcast Dispatcher
//!
//! グループ名とイベントを受け取り、配信時点の所属接続にイベントを届けます。
//! 配信は fire-and-forget で、失敗はログに残すだけです。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, GroupEvent, GroupName, MessagePusher};

pub struct BroadcastDispatcher {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastDispatcher {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// ToGroup: deliver to whoever is a member of `group` at dispatch time.
    pub async fn to_group(&self, group: &GroupName, event: &GroupEvent) {
        let members = self.registry.members(group).await;
        if members.is_empty() {
            tracing::debug!("No members in group '{}', skipping {}", group, event.name());
            return;
        }

        let recipients = members.len();
        if let Err(e) = self.message_pusher.broadcast(members, event).await {
            tracing::warn!(
                "Failed to broadcast {} to group '{}': {}",
                event.name(),
                group,
                e
            );
        } else {
            tracing::debug!(
                "Dispatched {} to {} member(s) of group '{}'",
                event.name(),
                recipients,
                group
            );
        }
    }

    /// ToCaller: deliver to exactly one connection.
    pub async fn to_caller(&self, connection: &ConnectionId, event: &GroupEvent) {
        if let Err(e) = self.message_pusher.push_to(connection, event).await {
            tracing::warn!(
                "Failed to push {} to connection '{}': {}",
                event.name(),
                connection,
                e
            );
        }
    }

    /// ToAll: deliver to every connected client regardless of group.
    pub async fn to_all(&self, event: &GroupEvent) {
        if let Err(e) = self.message_pusher.broadcast_all(event).await {
            tracing::warn!("Failed to broadcast {} to all clients: {}", event.name(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockMessagePusher, Round},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryConnectionRegistry,
        },
    };
    use tokio::sync::mpsc;

    fn group(name: &str) -> GroupName {
        GroupName::new(name.to_string()).unwrap()
    }

    fn connection(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_to_group_reaches_only_members() {
        // テスト項目: ToGroup はグループの所属接続にだけ届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let dispatcher = BroadcastDispatcher::new(registry.clone(), pusher.clone());

        let (tx_member, mut rx_member) = mpsc::unbounded_channel();
        let (tx_other, mut rx_other) = mpsc::unbounded_channel();
        pusher.register_client(connection("member"), tx_member).await;
        pusher.register_client(connection("other"), tx_other).await;
        registry.join(&connection("member"), &group("a")).await;
        registry.join(&connection("other"), &group("b")).await;

        // when (操作):
        dispatcher
            .to_group(&group("a"), &GroupEvent::RoundUpdated(Round(2)))
            .await;

        // then (期待する結果):
        assert!(rx_member.recv().await.is_some());
        assert!(rx_other.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_to_group_with_no_members_does_not_push() {
        // テスト項目: 所属接続がいないグループには送信処理自体が行われない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().times(0);
        let dispatcher = BroadcastDispatcher::new(registry, Arc::new(pusher));

        // when (操作) / then (期待する結果): モックの期待値で検証
        dispatcher
            .to_group(&group("empty"), &GroupEvent::RoundUpdated(Round(1)))
            .await;
    }

    #[tokio::test]
    async fn test_to_caller_failure_is_swallowed() {
        // テスト項目: ToCaller の送信失敗は呼び出し側に伝播しない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let dispatcher = BroadcastDispatcher::new(registry, pusher);

        // when (操作) / then (期待する結果): パニックせずに終わる
        dispatcher
            .to_caller(&connection("gone"), &GroupEvent::Error("x".to_string()))
            .await;
    }
}
