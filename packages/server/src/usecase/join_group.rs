//! UseCase: グループ参加処理（JoinGroup）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinGroupUseCase::execute() メソッド
//! - 受け入れ判定（GroupFull / CapacityExceeded）、状態の遅延作成、所属の登録、スナップショット送信
//!
//! ### なぜこのテストが必要か
//! - 参加直後のクライアントが現在の状態（Score → Timer → Round）を受け取ることを保証
//! - 拒否された参加が所属を変化させないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規グループへの参加、既存グループへの参加
//! - 異常系：満員のグループ、グループ数の上限、空のグループ名
//! - エッジケース：期限切れグループへの再参加

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, GroupEvent, GroupName, GroupState, GroupStateRepository,
    RegistryError,
};

use super::{
    dispatcher::BroadcastDispatcher,
    error::JoinGroupError,
    group_lifecycle::{Admission, GroupLifecycleManager, RejectReason},
};

/// グループ参加のユースケース
pub struct JoinGroupUseCase {
    groups: Arc<dyn GroupStateRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    lifecycle: Arc<GroupLifecycleManager>,
    dispatcher: Arc<BroadcastDispatcher>,
}

impl JoinGroupUseCase {
    pub fn new(
        groups: Arc<dyn GroupStateRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        lifecycle: Arc<GroupLifecycleManager>,
        dispatcher: Arc<BroadcastDispatcher>,
    ) -> Self {
        Self {
            groups,
            registry,
            lifecycle,
            dispatcher,
        }
    }

    /// グループ参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection` - 参加する接続
    /// * `group_name` - クライアントが指定したグループ名（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(GroupState)` - 参加成功（呼び出し元に送ったスナップショット）
    /// * `Err(JoinGroupError)` - 参加拒否（所属は変化しない）
    pub async fn execute(
        &self,
        connection: &ConnectionId,
        group_name: &str,
    ) -> Result<GroupState, JoinGroupError> {
        let group = GroupName::new(group_name.to_string())?;
        let limits = self.lifecycle.limits();

        // 1. 受け入れ判定（必要なら期限切れグループを回収）
        //    許可（JoinPermit）は所属の登録まで保持し、その間の回収を待たせる
        let permit = match self.lifecycle.admit_join(&group, connection).await {
            Admission::Allowed(permit) => permit,
            Admission::Rejected(RejectReason::GroupFull) => {
                return Err(JoinGroupError::GroupFull {
                    group: group.into_string(),
                    max: limits.max_connections_per_group,
                });
            }
            Admission::Rejected(RejectReason::CapacityExceeded) => {
                return Err(JoinGroupError::CapacityExceeded {
                    max: limits.max_groups,
                });
            }
        };

        // 2. 状態を取得 or 作成（作成時刻はここで一度だけ記録される）
        let state = self
            .groups
            .get_or_create(&group, self.lifecycle.now(), limits.max_groups)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to create group '{}': {}", group, e);
                JoinGroupError::CapacityExceeded {
                    max: limits.max_groups,
                }
            })?;

        // 3. 所属を登録（判定と登録の間に他の接続が参加した場合もここで上限が守られる）
        let newly_joined = self
            .registry
            .try_join(connection, &group, limits.max_connections_per_group)
            .await
            .map_err(|RegistryError::GroupFull { group, max }| JoinGroupError::GroupFull {
                group,
                max,
            })?;
        drop(permit);
        if newly_joined {
            tracing::info!("Connection '{}' joined group '{}'", connection, group);
        } else {
            tracing::debug!("Connection '{}' re-joined group '{}'", connection, group);
        }

        // 4. 所属登録後の状態を読み直し、呼び出し元にだけ送信
        //    （登録後の更新はブロードキャストでも届くため取りこぼしはない）
        let state = self.groups.get(&group).await.unwrap_or(state);
        for event in GroupEvent::snapshot(&state) {
            self.dispatcher.to_caller(connection, &event).await;
        }

        Ok(state)
    }

    /// 拒否理由を呼び出し元に `Error` イベントで通知する
    pub async fn report_rejection(&self, connection: &ConnectionId, error: &JoinGroupError) {
        if error.is_reported() {
            self.dispatcher
                .to_caller(connection, &GroupEvent::Error(error.to_string()))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{GroupLimits, GroupStateUpdate, MessagePusher, Round, Score, Timer},
        infrastructure::{
            dto::websocket::ServerEvent,
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryConnectionRegistry, InMemoryGroupStateRepository},
        },
    };
    use async_trait::async_trait;
    use scoreline_shared::time::ManualClock;
    use tokio::sync::{Notify, mpsc};

    const HOUR: i64 = 60 * 60 * 1000;

    struct Fixture {
        usecase: JoinGroupUseCase,
        groups: Arc<InMemoryGroupStateRepository>,
        registry: Arc<InMemoryConnectionRegistry>,
        pusher: Arc<WebSocketMessagePusher>,
        clock: Arc<ManualClock>,
    }

    fn create_fixture() -> Fixture {
        let groups = Arc::new(InMemoryGroupStateRepository::default());
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let clock = Arc::new(ManualClock::new(0));
        let lifecycle = Arc::new(GroupLifecycleManager::new(
            groups.clone(),
            registry.clone(),
            clock.clone(),
            GroupLimits::default(),
        ));
        let dispatcher = Arc::new(BroadcastDispatcher::new(registry.clone(), pusher.clone()));
        let usecase = JoinGroupUseCase::new(groups.clone(), registry.clone(), lifecycle, dispatcher);
        Fixture {
            usecase,
            groups,
            registry,
            pusher,
            clock,
        }
    }

    async fn connect(fixture: &Fixture, id: &str) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection = ConnectionId::new(id.to_string()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        fixture.pusher.register_client(connection.clone(), tx).await;
        (connection, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(json) = rx.try_recv() {
            events.push(serde_json::from_str(&json).unwrap());
        }
        events
    }

    fn group(name: &str) -> GroupName {
        GroupName::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_fresh_group_sends_default_snapshot() {
        // テスト項目: 新規グループに参加するとデフォルト値のスナップショットが 3 イベントで届く
        // given (前提条件):
        let fixture = create_fixture();
        let (alice, mut rx) = connect(&fixture, "alice").await;

        // when (操作):
        let result = fixture.usecase.execute(&alice, "court").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            drain(&mut rx),
            vec![
                ServerEvent::ReceiveScoreUpdate {
                    team1_score: 0,
                    team2_score: 0,
                    team1_penalty: 0,
                    team2_penalty: 0,
                },
                ServerEvent::ReceiveTimerUpdate {
                    minutes: 2,
                    seconds: 0,
                    is_running: false,
                },
                ServerEvent::ReceiveRoundUpdate { round: 1 },
            ]
        );
        assert!(fixture.registry.contains(&alice, &group("court")).await);
    }

    #[tokio::test]
    async fn test_join_existing_group_sends_current_state() {
        // テスト項目: 既存グループに参加すると現在の状態が届く
        // given (前提条件):
        let fixture = create_fixture();
        let (alice, _rx_alice) = connect(&fixture, "alice").await;
        let (bob, mut rx_bob) = connect(&fixture, "bob").await;
        fixture.usecase.execute(&alice, "court").await.unwrap();
        fixture
            .groups
            .update(
                &group("court"),
                GroupStateUpdate::Score(Score {
                    team1_score: 7,
                    team2_score: 5,
                    team1_penalty: 1,
                    team2_penalty: 0,
                }),
            )
            .await
            .unwrap();
        fixture
            .groups
            .update(&group("court"), GroupStateUpdate::Timer(Timer::stopped(0, 30)))
            .await
            .unwrap();
        fixture
            .groups
            .update(&group("court"), GroupStateUpdate::Round(Round(3)))
            .await
            .unwrap();

        // when (操作):
        fixture.usecase.execute(&bob, "court").await.unwrap();

        // then (期待する結果):
        let events = drain(&mut rx_bob);
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            ServerEvent::ReceiveScoreUpdate {
                team1_score: 7,
                team2_score: 5,
                team1_penalty: 1,
                team2_penalty: 0,
            }
        );
        assert_eq!(
            events[1],
            ServerEvent::ReceiveTimerUpdate {
                minutes: 0,
                seconds: 30,
                is_running: false,
            }
        );
        assert_eq!(events[2], ServerEvent::ReceiveRoundUpdate { round: 3 });
        assert_eq!(fixture.registry.connection_count(&group("court")).await, 2);
    }

    #[tokio::test]
    async fn test_join_full_group_is_rejected_without_membership_change() {
        // テスト項目: (上限 + 1) 番目の接続は GroupFull になり、所属は変化しない
        // given (前提条件):
        let fixture = create_fixture();
        let mut receivers = Vec::new();
        for id in ["a", "b", "c", "d"] {
            let (connection, rx) = connect(&fixture, id).await;
            fixture.usecase.execute(&connection, "court").await.unwrap();
            receivers.push(rx);
        }
        let (late, mut rx_late) = connect(&fixture, "late").await;

        // when (操作):
        let result = fixture.usecase.execute(&late, "court").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(JoinGroupError::GroupFull {
                group: "court".to_string(),
                max: 4,
            })
        );
        assert_eq!(fixture.registry.connection_count(&group("court")).await, 4);
        assert!(!fixture.registry.contains(&late, &group("court")).await);
        // スナップショットは送られない
        assert!(drain(&mut rx_late).is_empty());
    }

    #[tokio::test]
    async fn test_report_rejection_sends_error_event() {
        // テスト項目: 拒否理由が Error イベントとして呼び出し元に届く
        // given (前提条件):
        let fixture = create_fixture();
        let (alice, mut rx) = connect(&fixture, "alice").await;
        let error = JoinGroupError::GroupFull {
            group: "court".to_string(),
            max: 4,
        };

        // when (操作):
        fixture.usecase.report_rejection(&alice, &error).await;

        // then (期待する結果):
        assert_eq!(
            drain(&mut rx),
            vec![ServerEvent::Error {
                message: error.to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_join_new_group_over_capacity_is_rejected() {
        // テスト項目: グループ数が上限で回収できない場合、新規グループは CapacityExceeded
        // given (前提条件):
        let fixture = create_fixture();
        let (alice, _rx) = connect(&fixture, "alice").await;
        for name in ["a", "b", "c"] {
            fixture.usecase.execute(&alice, name).await.unwrap();
        }

        // when (操作):
        let result = fixture.usecase.execute(&alice, "d").await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinGroupError::CapacityExceeded { max: 3 }));
        assert!(!fixture.groups.exists(&group("d")).await);
        assert!(!fixture.registry.contains(&alice, &group("d")).await);
    }

    #[tokio::test]
    async fn test_join_empty_group_name_is_invalid() {
        // テスト項目: 空のグループ名は InvalidGroupName になり、何も作成されない
        // given (前提条件):
        let fixture = create_fixture();
        let (alice, mut rx) = connect(&fixture, "alice").await;

        // when (操作):
        let result = fixture.usecase.execute(&alice, "").await;

        // then (期待する結果):
        assert!(matches!(result, Err(JoinGroupError::InvalidGroupName(_))));
        assert!(!result.unwrap_err().is_reported());
        assert_eq!(fixture.groups.count().await, 0);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_join_twice_is_idempotent() {
        // テスト項目: 同じ接続が 2 回参加しても所属数は増えない
        // given (前提条件):
        let fixture = create_fixture();
        let (alice, _rx) = connect(&fixture, "alice").await;

        // when (操作):
        fixture.usecase.execute(&alice, "court").await.unwrap();
        fixture.usecase.execute(&alice, "court").await.unwrap();

        // then (期待する結果):
        assert_eq!(fixture.registry.connection_count(&group("court")).await, 1);
    }

    #[tokio::test]
    async fn test_join_after_expiry_creates_fresh_state() {
        // テスト項目: 回収されたグループへの再参加はデフォルト値の新しい状態になる
        // given (前提条件):
        let fixture = create_fixture();
        let (alice, _rx_alice) = connect(&fixture, "alice").await;
        for name in ["court", "b", "c"] {
            fixture.usecase.execute(&alice, name).await.unwrap();
        }
        fixture
            .groups
            .update(&group("court"), GroupStateUpdate::Round(Round(5)))
            .await
            .unwrap();
        fixture.clock.advance(HOUR + 1);
        // 上限に達しているので、新しいグループの参加で回収が走る
        let (bob, _rx_bob) = connect(&fixture, "bob").await;
        fixture.usecase.execute(&bob, "d").await.unwrap();
        assert!(!fixture.groups.exists(&group("court")).await);

        // when (操作):
        let state = fixture.usecase.execute(&bob, "court").await;

        // then (期待する結果): 全て回収済みなので "d" と "court" の 2 グループだけが存在する
        let state = state.unwrap();
        assert_eq!(state.round, Round(1));
        assert_eq!(state.created_at().value(), HOUR + 1);
        assert_eq!(fixture.groups.count().await, 2);
        assert!(!fixture.registry.contains(&alice, &group("court")).await);
    }

    /// remove_group の途中で止められる ConnectionRegistry（回収の途中を再現する）
    #[derive(Default)]
    struct PausingRegistry {
        inner: InMemoryConnectionRegistry,
        entered: Notify,
        resume: Notify,
    }

    #[async_trait]
    impl ConnectionRegistry for PausingRegistry {
        async fn join(&self, connection: &ConnectionId, group: &GroupName) -> bool {
            self.inner.join(connection, group).await
        }

        async fn try_join(
            &self,
            connection: &ConnectionId,
            group: &GroupName,
            max_connections: usize,
        ) -> Result<bool, RegistryError> {
            self.inner.try_join(connection, group, max_connections).await
        }

        async fn leave(&self, connection: &ConnectionId, group: &GroupName) -> bool {
            self.inner.leave(connection, group).await
        }

        async fn remove_connection(&self, connection: &ConnectionId) -> Vec<GroupName> {
            self.inner.remove_connection(connection).await
        }

        async fn remove_group(&self, group: &GroupName) -> Vec<ConnectionId> {
            self.entered.notify_one();
            self.resume.notified().await;
            self.inner.remove_group(group).await
        }

        async fn members(&self, group: &GroupName) -> Vec<ConnectionId> {
            self.inner.members(group).await
        }

        async fn connection_count(&self, group: &GroupName) -> usize {
            self.inner.connection_count(group).await
        }

        async fn contains(&self, connection: &ConnectionId, group: &GroupName) -> bool {
            self.inner.contains(connection, group).await
        }
    }

    #[tokio::test]
    async fn test_join_during_reclaim_waits_for_sweep() {
        // テスト項目: 回収の途中（状態は削除済み、所属は未削除）に来た join は回収の完了を待ち、
        //            新しいグループの唯一のメンバーとして残る
        // given (前提条件):
        let groups = Arc::new(InMemoryGroupStateRepository::default());
        let registry = Arc::new(PausingRegistry::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let clock = Arc::new(ManualClock::new(0));
        let lifecycle = Arc::new(GroupLifecycleManager::new(
            groups.clone(),
            registry.clone(),
            clock.clone(),
            GroupLimits::default(),
        ));
        let dispatcher = Arc::new(BroadcastDispatcher::new(registry.clone(), pusher));
        let usecase = Arc::new(JoinGroupUseCase::new(
            groups.clone(),
            registry.clone(),
            lifecycle.clone(),
            dispatcher,
        ));
        let alice = ConnectionId::new("alice".to_string()).unwrap();
        let bob = ConnectionId::new("bob".to_string()).unwrap();
        usecase.execute(&alice, "court").await.unwrap();
        clock.advance(HOUR + 1);

        let sweep = tokio::spawn({
            let lifecycle = lifecycle.clone();
            async move { lifecycle.reclaim_expired().await }
        });
        registry.entered.notified().await;

        // when (操作):
        let join = tokio::spawn({
            let usecase = usecase.clone();
            let bob = bob.clone();
            async move { usecase.execute(&bob, "court").await }
        });
        tokio::task::yield_now().await;
        registry.resume.notify_one();
        let reclaimed = sweep.await.unwrap();
        let result = join.await.unwrap();

        // then (期待する結果):
        assert_eq!(reclaimed, vec![group("court")]);
        let state = result.unwrap();
        assert_eq!(state.created_at().value(), HOUR + 1);
        assert!(groups.exists(&group("court")).await);
        assert_eq!(registry.members(&group("court")).await, vec![bob]);
    }
}
