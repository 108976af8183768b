use thiserror::Error;

use crate::errors::domain::{DomainError, InfraErrorKind};

/// Failure of a shared store (verdicts or counters).
///
/// Callers on the guess path log these and carry on; they never fail a
/// guess on their own.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored value is corrupt: {0}")]
    Corrupt(String),
}

impl From<::redis::RedisError> for StoreError {
    fn from(err: ::redis::RedisError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::infra(InfraErrorKind::StoreUnavailable, err.to_string())
    }
}
