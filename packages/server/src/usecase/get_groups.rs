//! UseCase: グループ一覧・詳細の取得（HTTP API 用の読み取り専用操作）

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, GroupName, GroupState, GroupStateRepository};

use super::error::GetGroupError;

/// グループの状態と現在の所属数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOverview {
    pub name: GroupName,
    pub state: GroupState,
    pub connections: usize,
}

pub struct GetGroupsUseCase {
    groups: Arc<dyn GroupStateRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetGroupsUseCase {
    pub fn new(
        groups: Arc<dyn GroupStateRepository>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self { groups, registry }
    }

    /// 全グループ（グループ名順）
    pub async fn list(&self) -> Vec<GroupOverview> {
        let mut overviews = Vec::new();
        for (name, state) in self.groups.list().await {
            let connections = self.registry.connection_count(&name).await;
            overviews.push(GroupOverview {
                name,
                state,
                connections,
            });
        }
        overviews
    }

    pub async fn detail(&self, group_name: &str) -> Result<GroupOverview, GetGroupError> {
        let not_found = || GetGroupError::NotFound(group_name.to_string());
        let name = GroupName::new(group_name.to_string()).map_err(|_| not_found())?;
        let state = self.groups.get(&name).await.map_err(|_| not_found())?;
        let connections = self.registry.connection_count(&name).await;
        Ok(GroupOverview {
            name,
            state,
            connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, Timestamp},
        infrastructure::repository::{InMemoryConnectionRegistry, InMemoryGroupStateRepository},
    };

    fn group(name: &str) -> GroupName {
        GroupName::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_list_and_detail() {
        // テスト項目: 一覧と詳細に状態と所属数が含まれる
        // given (前提条件):
        let groups = Arc::new(InMemoryGroupStateRepository::default());
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = GetGroupsUseCase::new(groups.clone(), registry.clone());
        for name in ["b", "a"] {
            groups
                .get_or_create(&group(name), Timestamp::new(0), usize::MAX)
                .await
                .unwrap();
        }
        registry
            .join(&ConnectionId::new("alice".to_string()).unwrap(), &group("a"))
            .await;

        // when (操作):
        let list = usecase.list().await;
        let detail = usecase.detail("a").await.unwrap();

        // then (期待する結果):
        let names: Vec<&str> = list.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(list[0].connections, 1);
        assert_eq!(list[1].connections, 0);
        assert_eq!(detail.connections, 1);
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        // テスト項目: 存在しないグループ・不正なグループ名は NotFound
        // given (前提条件):
        let usecase = GetGroupsUseCase::new(
            Arc::new(InMemoryGroupStateRepository::default()),
            Arc::new(InMemoryConnectionRegistry::new()),
        );

        // then (期待する結果):
        assert_eq!(
            usecase.detail("ghost").await,
            Err(GetGroupError::NotFound("ghost".to_string()))
        );
        assert!(usecase.detail("").await.is_err());
    }
}
