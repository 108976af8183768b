use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Persona, Verdict};

/// Failure of a single upstream judgment. Never cached.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("oracle timed out")]
    Timeout,
    #[error("oracle transport error: {0}")]
    Transport(String),
    #[error("oracle returned a malformed response: {0}")]
    Malformed(String),
}

impl OracleError {
    /// Worth another attempt inside the client.
    pub fn is_transient(&self) -> bool {
        matches!(self, OracleError::Timeout | OracleError::Transport(_))
    }
}

/// Decides whether `candidate` beats `current_word`.
///
/// Implementations may be slow and may fail; callers bound them with a
/// timeout and never cache a failure.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn judge(
        &self,
        current_word: &str,
        candidate: &str,
        persona: Persona,
    ) -> Result<Verdict, OracleError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Moderation {
    Allowed,
    Rejected(String),
}

/// Screens raw player input before it reaches the judge.
#[async_trait]
pub trait Moderator: Send + Sync {
    async fn moderate(&self, text: &str) -> Moderation;
}
