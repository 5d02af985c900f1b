//! InMemory Group State Repository 実装
//!
//! GroupState をグループ名をキーとする `DashMap` に保持します。
//! 更新は `get_mut` のガード（シャードの書き込みロック）の中で行い、
//! スナップショットを clone してからロックを解放します。
//! 呼び出し側は解放後のスナップショットを使って配信するため、配信中にロックを保持しません。

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{
    GroupName, GroupState, GroupStateRepository, GroupStateUpdate, RepositoryError, Timer,
    Timestamp,
};

/// インメモリ GroupState Repository
pub struct InMemoryGroupStateRepository {
    groups: DashMap<GroupName, GroupState>,
    /// Timer shown by newly created groups.
    initial_timer: Timer,
    /// Serializes group creation so the group-count check and the insert are atomic.
    /// Reads and updates of existing groups never take it.
    creation_lock: Mutex<()>,
}

impl Default for InMemoryGroupStateRepository {
    fn default() -> Self {
        Self::new(Timer::default())
    }
}

impl InMemoryGroupStateRepository {
    pub fn new(initial_timer: Timer) -> Self {
        Self {
            groups: DashMap::new(),
            initial_timer,
            creation_lock: Mutex::new(()),
        }
    }

    fn get_or_create_locked(
        &self,
        group: &GroupName,
        now: Timestamp,
        max_groups: usize,
    ) -> Result<GroupState, RepositoryError> {
        if let Some(state) = self.groups.get(group) {
            return Ok(state.clone());
        }

        let _creation = self
            .creation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another join may have created it while we were waiting.
        if let Some(state) = self.groups.get(group) {
            return Ok(state.clone());
        }
        if self.groups.len() >= max_groups {
            return Err(RepositoryError::CapacityExceeded { max: max_groups });
        }

        let state = GroupState::new(now, self.initial_timer);
        self.groups.insert(group.clone(), state.clone());
        tracing::debug!("Group '{}' state created", group);
        Ok(state)
    }

    fn update_locked(
        &self,
        group: &GroupName,
        update: GroupStateUpdate,
    ) -> Result<GroupState, RepositoryError> {
        let mut state = self
            .groups
            .get_mut(group)
            .ok_or_else(|| RepositoryError::GroupNotFound(group.as_str().to_string()))?;
        state.apply(update);
        Ok(state.clone())
    }
}

#[async_trait]
impl GroupStateRepository for InMemoryGroupStateRepository {
    async fn get_or_create(
        &self,
        group: &GroupName,
        now: Timestamp,
        max_groups: usize,
    ) -> Result<GroupState, RepositoryError> {
        self.get_or_create_locked(group, now, max_groups)
    }

    async fn get(&self, group: &GroupName) -> Result<GroupState, RepositoryError> {
        self.groups
            .get(group)
            .map(|state| state.clone())
            .ok_or_else(|| RepositoryError::GroupNotFound(group.as_str().to_string()))
    }

    async fn update(
        &self,
        group: &GroupName,
        update: GroupStateUpdate,
    ) -> Result<GroupState, RepositoryError> {
        self.update_locked(group, update)
    }

    async fn remove_expired(&self, now: Timestamp, lifetime_millis: i64) -> Vec<GroupName> {
        let mut removed = Vec::new();
        self.groups.retain(|group, state| {
            let expired = state.is_expired(now, lifetime_millis);
            if expired {
                removed.push(group.clone());
            }
            !expired
        });
        removed.sort();
        removed
    }

    async fn exists(&self, group: &GroupName) -> bool {
        self.groups.contains_key(group)
    }

    async fn count(&self) -> usize {
        self.groups.len()
    }

    async fn list(&self) -> Vec<(GroupName, GroupState)> {
        let mut groups: Vec<(GroupName, GroupState)> = self
            .groups
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));
        groups
    }
}
