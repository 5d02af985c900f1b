//! InMemory Connection Registry 実装

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{ConnectionId, ConnectionRegistry, GroupName, RegistryError};

/// インメモリ Connection Registry
///
/// Key: グループ名 / Value: 所属している接続の集合。
/// 空になった集合はエントリごと削除されるため、マップ内の集合は常に空でない。
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    groups: DashMap<GroupName, HashSet<ConnectionId>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the entry for `group` if nobody is left in it.
    fn prune_if_empty(&self, group: &GroupName) {
        self.groups.remove_if(group, |_, members| members.is_empty());
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn join(&self, connection: &ConnectionId, group: &GroupName) -> bool {
        self.groups
            .entry(group.clone())
            .or_default()
            .insert(connection.clone())
    }

    async fn try_join(
        &self,
        connection: &ConnectionId,
        group: &GroupName,
        max_connections: usize,
    ) -> Result<bool, RegistryError> {
        let full = || RegistryError::GroupFull {
            group: group.as_str().to_string(),
            max: max_connections,
        };
        if max_connections == 0 {
            return Err(full());
        }

        // The entry guard holds the shard lock, so the size check and the insert are atomic.
        let mut members = self.groups.entry(group.clone()).or_default();
        if members.contains(connection) {
            return Ok(false);
        }
        if members.len() >= max_connections {
            return Err(full());
        }
        Ok(members.insert(connection.clone()))
    }

    async fn leave(&self, connection: &ConnectionId, group: &GroupName) -> bool {
        let removed = match self.groups.get_mut(group) {
            Some(mut members) => members.remove(connection),
            None => return false,
        };
        self.prune_if_empty(group);
        removed
    }

    async fn remove_connection(&self, connection: &ConnectionId) -> Vec<GroupName> {
        let mut left = Vec::new();
        self.groups.retain(|group, members| {
            if members.remove(connection) {
                left.push(group.clone());
            }
            !members.is_empty()
        });
        left.sort();
        left
    }

    async fn remove_group(&self, group: &GroupName) -> Vec<ConnectionId> {
        self.groups
            .remove(group)
            .map(|(_, members)| members.into_iter().collect())
            .unwrap_or_default()
    }

    async fn members(&self, group: &GroupName) -> Vec<ConnectionId> {
        let mut members: Vec<ConnectionId> = self
            .groups
            .get(group)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    async fn connection_count(&self, group: &GroupName) -> usize {
        self.groups.get(group).map(|members| members.len()).unwrap_or(0)
    }

    async fn contains(&self, connection: &ConnectionId, group: &GroupName) -> bool {
        self.groups
            .get(group)
            .is_some_and(|members| members.contains(connection))
    }
}
