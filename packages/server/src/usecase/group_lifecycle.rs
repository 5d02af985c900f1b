//! Group Lifecycle Manager
//!
//! グループ数・グループあたりの接続数の上限による参加の受け入れ判定と、
//! 寿命を超えたグループの回収（状態・所属・作成時刻の削除）を担当します。
//!
//! ## グループの状態遷移
//!
//! ```text
//! Nonexistent → Active（最初の join）→ Reclaimed（寿命超過 + 回収）→ Nonexistent
//! ```
//!
//! 回収されたグループへの join は、デフォルト値を持つ新しいグループの作成として扱われます。

use std::{sync::Arc, time::Duration};

use scoreline_shared::time::Clock;
use tokio::{
    sync::{RwLock, RwLockReadGuard},
    task::JoinHandle,
};

use crate::domain::{
    ConnectionId, ConnectionRegistry, GroupLimits, GroupName, GroupStateRepository, Timestamp,
};

/// 参加の受け入れ判定の結果
#[derive(Debug)]
pub enum Admission<'a> {
    Allowed(JoinPermit<'a>),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The group exists and already holds the maximum number of connections.
    GroupFull,
    /// A new group was requested while at the group cap, and reclamation freed nothing.
    CapacityExceeded,
}

/// 受け入れ済みの join が所属の登録を終えるまで保持する許可
///
/// 保持している間は回収が始まらない。回収の途中（状態は削除済み、所属は未削除）の
/// グループに join が入り込むことはない。
#[derive(Debug)]
pub struct JoinPermit<'a> {
    _guard: RwLockReadGuard<'a, ()>,
}

pub struct GroupLifecycleManager {
    groups: Arc<dyn GroupStateRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
    limits: GroupLimits,
    /// join（read）と回収（write）の排他
    reclaim_lock: RwLock<()>,
}

impl GroupLifecycleManager {
    pub fn new(
        groups: Arc<dyn GroupStateRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        clock: Arc<dyn Clock>,
        limits: GroupLimits,
    ) -> Self {
        Self {
            groups,
            registry,
            clock,
            limits,
            reclaim_lock: RwLock::new(()),
        }
    }

    pub fn limits(&self) -> GroupLimits {
        self.limits
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// AdmitJoin
    ///
    /// - 既存グループ: 既に所属している接続は常に許可。それ以外は所属数が上限以上なら `GroupFull`。
    ///   既存グループがグループ数の上限を理由に拒否されることはない。
    /// - 新規グループ: グループ数が上限以上なら回収を実行し、それでも空きがなければ `CapacityExceeded`。
    ///
    /// 許可された場合の `JoinPermit` は、呼び出し側が所属の登録を終えるまで保持すること。
    pub async fn admit_join(&self, group: &GroupName, connection: &ConnectionId) -> Admission<'_> {
        let guard = self.reclaim_lock.read().await;
        if let Some(decision) = self.admit_existing(group, connection).await {
            return Self::decide(decision, guard);
        }
        if self.groups.count().await < self.limits.max_groups {
            return Admission::Allowed(JoinPermit { _guard: guard });
        }

        // 回収は write ロックを取るので、いったん手放してから判定し直す
        drop(guard);
        self.reclaim_expired().await;
        let guard = self.reclaim_lock.read().await;
        if let Some(decision) = self.admit_existing(group, connection).await {
            return Self::decide(decision, guard);
        }
        if self.groups.count().await >= self.limits.max_groups {
            tracing::warn!(
                "Group capacity reached ({}), rejecting new group '{}'",
                self.limits.max_groups,
                group
            );
            return Admission::Rejected(RejectReason::CapacityExceeded);
        }

        Admission::Allowed(JoinPermit { _guard: guard })
    }

    /// 既存グループへの join の判定（グループが存在しなければ `None`）
    async fn admit_existing(
        &self,
        group: &GroupName,
        connection: &ConnectionId,
    ) -> Option<Result<(), RejectReason>> {
        if !self.groups.exists(group).await {
            return None;
        }
        if self.registry.contains(connection, group).await {
            return Some(Ok(()));
        }
        let connections = self.registry.connection_count(group).await;
        if connections >= self.limits.max_connections_per_group {
            tracing::warn!(
                "Group '{}' is full ({}/{}), rejecting '{}'",
                group,
                connections,
                self.limits.max_connections_per_group,
                connection
            );
            return Some(Err(RejectReason::GroupFull));
        }
        Some(Ok(()))
    }

    fn decide(
        decision: Result<(), RejectReason>,
        guard: RwLockReadGuard<'_, ()>,
    ) -> Admission<'_> {
        match decision {
            Ok(()) => Admission::Allowed(JoinPermit { _guard: guard }),
            Err(reason) => Admission::Rejected(reason),
        }
    }

    /// ReclaimExpired
    ///
    /// 作成から寿命を超えて経過した全グループの状態と所属を削除し、その名前を返す。
    /// 状態と所属の削除の間に join が割り込むことはない。
    pub async fn reclaim_expired(&self) -> Vec<GroupName> {
        let _exclusive = self.reclaim_lock.write().await;
        let now = self.now();
        let reclaimed = self
            .groups
            .remove_expired(now, self.limits.lifetime_millis())
            .await;

        for group in &reclaimed {
            let members = self.registry.remove_group(group).await;
            tracing::info!(
                "Group '{}' reclaimed after exceeding its lifetime ({} member(s) dropped)",
                group,
                members.len()
            );
        }

        reclaimed
    }

    /// Run `reclaim_expired` every `period` until the returned task is aborted.
    pub fn spawn_periodic_reclaim(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let reclaimed = self.reclaim_expired().await;
                if !reclaimed.is_empty() {
                    tracing::debug!("Periodic sweep reclaimed {} group(s)", reclaimed.len());
                }
            }
        })
    }
}
