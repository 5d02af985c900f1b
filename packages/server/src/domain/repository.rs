//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! - `ConnectionRegistry`: 接続とグループの所属関係（Membership）を排他的に管理
//! - `GroupStateRepository`: グループごとの状態（GroupState）を排他的に管理
//!
//! 2 つの trait は互いを参照しない。所属関係と状態の保持ポリシーは独立している。

use async_trait::async_trait;

use super::{
    ConnectionId, GroupName, GroupState, GroupStateUpdate, RegistryError, RepositoryError,
    Timestamp,
};

/// Connection Registry
///
/// 全ての操作は並行呼び出しに対して安全であり、所属の変更はグループ単位でアトミック。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// グループに接続を追加する（冪等）
    ///
    /// 新たに追加された場合は `true`、既に所属していた場合は `false`。
    async fn join(&self, connection: &ConnectionId, group: &GroupName) -> bool;

    /// 上限付きでグループに接続を追加する
    ///
    /// 既に所属している接続は上限に関係なく `Ok(false)`。
    /// 所属数が `max_connections` 以上なら `RegistryError::GroupFull`（所属は変化しない）。
    async fn try_join(
        &self,
        connection: &ConnectionId,
        group: &GroupName,
        max_connections: usize,
    ) -> Result<bool, RegistryError>;

    /// グループから接続を削除する（所属していなければ何もしない）
    ///
    /// 所属が空になったグループのエントリは削除される。
    async fn leave(&self, connection: &ConnectionId, group: &GroupName) -> bool;

    /// 接続を全てのグループから削除し、所属していたグループを返す
    async fn remove_connection(&self, connection: &ConnectionId) -> Vec<GroupName>;

    /// グループの所属を丸ごと削除し、所属していた接続を返す
    async fn remove_group(&self, group: &GroupName) -> Vec<ConnectionId>;

    /// 現在の所属接続（未知のグループは空）
    async fn members(&self, group: &GroupName) -> Vec<ConnectionId>;

    /// 現在の所属数（未知のグループは 0）
    async fn connection_count(&self, group: &GroupName) -> usize;

    async fn contains(&self, connection: &ConnectionId, group: &GroupName) -> bool;
}

/// Group State Store
///
/// 同一グループへの更新は直列化され、フィールドグループが部分的に適用された状態は観測されない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupStateRepository: Send + Sync {
    /// 既存の状態を返すか、デフォルト値で新規作成する
    ///
    /// 作成時刻は作成時に一度だけ `now` で記録される。
    /// 新規作成が必要で、既に `max_groups` 個以上のグループが存在する場合は
    /// `RepositoryError::CapacityExceeded`。既存グループは上限に関係なく返される。
    async fn get_or_create(
        &self,
        group: &GroupName,
        now: Timestamp,
        max_groups: usize,
    ) -> Result<GroupState, RepositoryError>;

    async fn get(&self, group: &GroupName) -> Result<GroupState, RepositoryError>;

    /// フィールドグループ単位の更新を適用し、更新後のスナップショットを返す
    ///
    /// グループが存在しない場合は何も適用せず `RepositoryError::GroupNotFound`。
    async fn update(
        &self,
        group: &GroupName,
        update: GroupStateUpdate,
    ) -> Result<GroupState, RepositoryError>;

    /// 作成から `lifetime_millis` を超えて経過した全グループの状態を削除し、その名前を返す
    ///
    /// 活動状況に関係なく無条件に削除する（LRU ではない）。作成時刻も状態と一緒に失われる。
    async fn remove_expired(&self, now: Timestamp, lifetime_millis: i64) -> Vec<GroupName>;

    async fn exists(&self, group: &GroupName) -> bool;

    /// 現在のグループ数
    async fn count(&self) -> usize;

    /// 全グループのスナップショット（グループ名順）
    async fn list(&self) -> Vec<(GroupName, GroupState)>;
}
