//! Error codes for the game backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses and in guess outcomes.

use core::fmt;

/// Centralized error codes for the game backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Gameplay
    /// Guess was empty after trimming
    EmptyInput,
    /// Session id is unknown or was evicted
    SessionNotFound,
    /// Session already reached game over
    SessionOver,
    /// Guess was already played in this session
    DuplicateWord,
    /// Guess was refused by moderation
    ContentRejected,
    /// Judgment service failed or timed out
    OracleUnavailable,

    // Request Validation
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// General not found error
    NotFound,

    // System Errors
    /// Shared verdict or counter store failed
    StoreUnavailable,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyInput => "EMPTY_INPUT",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::SessionOver => "SESSION_OVER",
            Self::DuplicateWord => "DUPLICATE_WORD",
            Self::ContentRejected => "CONTENT_REJECTED",
            Self::OracleUnavailable => "ORACLE_UNAVAILABLE",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::NotFound => "NOT_FOUND",

            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
