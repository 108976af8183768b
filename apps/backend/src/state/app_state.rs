use std::sync::Arc;

use crate::cache::VerdictCache;
use crate::config::GameConfig;
use crate::services::GameService;
use crate::sessions::SessionStore;

/// Shared handles given to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GameConfig>,
    pub games: GameService,
    pub sessions: Arc<SessionStore>,
    pub verdicts: VerdictCache,
    /// `"memory"` or `"redis"`.
    pub store_backend: &'static str,
}

impl AppState {
    pub fn new(
        config: Arc<GameConfig>,
        games: GameService,
        sessions: Arc<SessionStore>,
        verdicts: VerdictCache,
        store_backend: &'static str,
    ) -> Self {
        Self {
            config,
            games,
            sessions,
            verdicts,
            store_backend,
        }
    }
}
