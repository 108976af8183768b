use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{MemoryVerdictStore, RedisVerdictStore, VerdictCache, VerdictStore};
use crate::config::GameConfig;
use crate::counters::{CounterStore, MemoryCounterStore, RedisCounterStore, WordCounter};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::infra::redis_conn;
use crate::oracle::{HttpOracle, HttpOracleConfig, Moderator, Oracle, WordFilter};
use crate::services::{GameService, GameStats, GuessPipeline};
use crate::sessions::SessionStore;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    config: GameConfig,
    oracle: Option<Arc<dyn Oracle>>,
    moderator: Option<Arc<dyn Moderator>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            oracle: None,
            moderator: None,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_oracle(mut self, oracle: Arc<dyn Oracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_moderator(mut self, moderator: Arc<dyn Moderator>) -> Self {
        self.moderator = Some(moderator);
        self
    }

    /// Without an explicit oracle, an HTTP one is built from `ORACLE_URL`.
    /// Redis is used when configured and reachable; an unreachable server
    /// falls back to in-memory stores.
    pub async fn build(self) -> Result<AppState, AppError> {
        let config = self.config;

        let oracle = match self.oracle {
            Some(oracle) => oracle,
            None => Arc::new(
                HttpOracle::new(HttpOracleConfig {
                    base_url: config.require_oracle_url()?.to_string(),
                    request_timeout: config.oracle_timeout,
                    max_attempts: config.oracle_max_attempts,
                })
                .map_err(|err| AppError::config(format!("Unable to build oracle client: {err}")))?,
            ) as Arc<dyn Oracle>,
        };
        let moderator = self
            .moderator
            .unwrap_or_else(|| Arc::new(WordFilter::new()) as Arc<dyn Moderator>);

        let (verdict_store, counter_store) = build_stores(&config).await?;
        let store_backend = verdict_store.backend();

        let sessions = Arc::new(SessionStore::new(config.start_word.clone()));
        let verdicts = VerdictCache::new(verdict_store, oracle, config.oracle_timeout);
        let counter = WordCounter::new(counter_store);
        let stats = Arc::new(GameStats::new());

        let pipeline = GuessPipeline::new(
            Arc::clone(&sessions),
            verdicts.clone(),
            counter.clone(),
            moderator,
            Arc::clone(&stats),
        );
        let games = GameService::new(Arc::clone(&sessions), pipeline, counter, stats);

        info!(store_backend, "Application state ready");
        Ok(AppState::new(
            Arc::new(config),
            games,
            sessions,
            verdicts,
            store_backend,
        ))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

async fn build_stores(
    config: &GameConfig,
) -> Result<(Arc<dyn VerdictStore>, Arc<dyn CounterStore>), AppError> {
    if let Some(url) = config.redis_url.as_deref() {
        match redis_conn::connect(url).await {
            Ok(conn) => {
                return Ok((
                    Arc::new(RedisVerdictStore::new(conn.clone(), config.verdict_ttl)),
                    Arc::new(RedisCounterStore::new(conn)),
                ));
            }
            Err(err) if err.code() == ErrorCode::ConfigError => return Err(err),
            Err(err) => {
                warn!(error = %err, "Redis unreachable; using in-memory stores");
            }
        }
    }

    Ok((
        Arc::new(MemoryVerdictStore::new(
            config.verdict_cache_capacity,
            config.verdict_ttl,
        )),
        Arc::new(MemoryCounterStore::new()),
    ))
}
