//! Admission limits for groups.

use std::time::Duration;

/// グループ数・接続数・寿命の上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupLimits {
    /// Maximum number of live groups.
    pub max_groups: usize,
    /// Maximum number of connections in a single group.
    pub max_connections_per_group: usize,
    /// A group older than this is reclaimed by the next sweep.
    pub group_lifetime: Duration,
}

impl GroupLimits {
    pub const DEFAULT_MAX_GROUPS: usize = 3;
    pub const DEFAULT_MAX_CONNECTIONS_PER_GROUP: usize = 4;
    pub const DEFAULT_GROUP_LIFETIME: Duration = Duration::from_secs(60 * 60);

    pub fn lifetime_millis(&self) -> i64 {
        i64::try_from(self.group_lifetime.as_millis()).unwrap_or(i64::MAX)
    }
}

impl Default for GroupLimits {
    fn default() -> Self {
        Self {
            max_groups: Self::DEFAULT_MAX_GROUPS,
            max_connections_per_group: Self::DEFAULT_MAX_CONNECTIONS_PER_GROUP,
            group_lifetime: Self::DEFAULT_GROUP_LIFETIME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        // テスト項目: デフォルトの上限値（3 グループ / 4 接続 / 1 時間）
        // when (操作):
        let limits = GroupLimits::default();

        // then (期待する結果):
        assert_eq!(limits.max_groups, 3);
        assert_eq!(limits.max_connections_per_group, 4);
        assert_eq!(limits.lifetime_millis(), 3_600_000);
    }
}
