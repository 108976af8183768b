//! Runtime configuration from environment variables.
//!
//! Unset variables take their defaults; set-but-unparseable ones are a
//! configuration error rather than being silently replaced.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::START_WORD;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub host: String,
    pub port: u16,
    pub redis_url: Option<String>,
    pub oracle_url: Option<String>,
    pub oracle_timeout: Duration,
    pub oracle_max_attempts: u32,
    pub session_idle_ttl: Duration,
    pub session_sweep_interval: Duration,
    pub verdict_ttl: Duration,
    pub verdict_cache_capacity: u64,
    pub cors_allowed_origins: Vec<String>,
    pub start_word: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            redis_url: None,
            oracle_url: None,
            oracle_timeout: Duration::from_millis(10_000),
            oracle_max_attempts: 3,
            session_idle_ttl: Duration::from_secs(3600),
            session_sweep_interval: Duration::from_secs(60),
            verdict_ttl: Duration::from_secs(86_400),
            verdict_cache_capacity: 100_000,
            cors_allowed_origins: Vec::new(),
            start_word: START_WORD.to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            host: text("BACKEND_HOST").unwrap_or(defaults.host),
            port: parse(&text, "BACKEND_PORT")?.unwrap_or(defaults.port),
            redis_url: text("REDIS_URL"),
            oracle_url: text("ORACLE_URL"),
            oracle_timeout: parse(&text, "ORACLE_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.oracle_timeout),
            oracle_max_attempts: parse(&text, "ORACLE_MAX_ATTEMPTS")?
                .unwrap_or(defaults.oracle_max_attempts),
            session_idle_ttl: parse(&text, "SESSION_IDLE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_idle_ttl),
            session_sweep_interval: parse::<u64, _>(&text, "SESSION_SWEEP_INTERVAL_SECS")?
                .map(|secs| Duration::from_secs(secs.max(1)))
                .unwrap_or(defaults.session_sweep_interval),
            verdict_ttl: parse(&text, "VERDICT_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.verdict_ttl),
            verdict_cache_capacity: parse(&text, "VERDICT_CACHE_CAPACITY")?
                .unwrap_or(defaults.verdict_cache_capacity),
            cors_allowed_origins: text("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
            start_word: defaults.start_word,
        })
    }

    /// The binary can't judge anything without this.
    pub fn require_oracle_url(&self) -> Result<&str, AppError> {
        self.oracle_url
            .as_deref()
            .ok_or_else(|| AppError::config("Required environment variable 'ORACLE_URL' is not set"))
    }
}

fn parse<T, F>(text: &F, name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    text(name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|err| AppError::config(format!("Invalid value for '{name}' ({raw}): {err}")))
        })
        .transpose()
}

/// Comma separated; only `http(s)://` entries are kept.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}
