//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::ValueObjectError;

/// JoinGroup のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinGroupError {
    #[error("invalid group name: {0}")]
    InvalidGroupName(#[from] ValueObjectError),

    #[error("group '{group}' already has the maximum number of connections ({max})")]
    GroupFull { group: String, max: usize },

    #[error("the maximum number of groups ({max}) has been reached")]
    CapacityExceeded { max: usize },
}

impl JoinGroupError {
    /// Whether the caller should be told about the rejection with an `Error` event.
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::GroupFull { .. } | Self::CapacityExceeded { .. })
    }
}

/// UpdateScore / UpdateTimer / UpdateRound のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateGroupError {
    #[error("invalid group name: {0}")]
    InvalidGroupName(#[from] ValueObjectError),

    #[error("group not found: {0}")]
    NotFound(String),
}

/// LeaveGroup のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveGroupError {
    #[error("invalid group name: {0}")]
    InvalidGroupName(#[from] ValueObjectError),
}

/// グループ参照（HTTP）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetGroupError {
    #[error("group not found: {0}")]
    NotFound(String),
}
