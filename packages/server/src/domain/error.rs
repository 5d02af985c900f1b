//! Domain error types.

use thiserror::Error;

/// Value Object の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("group name must not be empty")]
    GroupNameEmpty,

    #[error("group name is too long (max {max} characters, got {actual})")]
    GroupNameTooLong { max: usize, actual: usize },

    #[error("connection id must not be empty")]
    ConnectionIdEmpty,
}

/// GroupStateRepository のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("group capacity exceeded (max {max} groups)")]
    CapacityExceeded { max: usize },
}

/// ConnectionRegistry のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("group '{group}' is full (max {max} connections)")]
    GroupFull { group: String, max: usize },
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("failed to encode event: {0}")]
    EncodeFailed(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
