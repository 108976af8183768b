//! Operations exposed to the transport layer.

use std::sync::Arc;

use serde::Serialize;

use super::guess_pipeline::{word_count_message, GuessPipeline, GuessResult};
use super::stats::{GameStats, LeaderboardEntry};
use crate::counters::{WordCount, WordCounter};
use crate::domain::{Persona, SessionId};
use crate::errors::domain::DomainError;
use crate::sessions::SessionStore;

const POPULAR_WORDS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct StartedGame {
    pub session_id: SessionId,
    pub start_word: String,
    pub score: u32,
    pub history: Vec<String>,
    pub persona: Persona,
    pub message: String,
    pub word_count_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameHistory {
    pub history: Vec<String>,
    pub score: u32,
    pub game_over: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub active_sessions: usize,
    pub popular_words: Vec<WordCount>,
    pub total_games: u64,
    pub max_score: u32,
    pub average_score: f64,
}

#[derive(Clone)]
pub struct GameService {
    sessions: Arc<SessionStore>,
    pipeline: GuessPipeline,
    counter: WordCounter,
    stats: Arc<GameStats>,
}

impl GameService {
    pub fn new(
        sessions: Arc<SessionStore>,
        pipeline: GuessPipeline,
        counter: WordCounter,
        stats: Arc<GameStats>,
    ) -> Self {
        Self {
            sessions,
            pipeline,
            counter,
            stats,
        }
    }

    pub async fn start_session(&self, persona: Persona) -> StartedGame {
        let handle = self.sessions.create(persona);
        let view = handle.view();
        let start_word = view.current_word;
        let count = self.counter.word_count_or_zero(&start_word).await;

        StartedGame {
            session_id: handle.id(),
            message: format!("Game started! What beats {start_word}?"),
            word_count_message: word_count_message(&start_word, count),
            start_word,
            score: view.score,
            history: view.history,
            persona,
        }
    }

    pub async fn submit_guess(
        &self,
        session_id: SessionId,
        guess: &str,
    ) -> Result<GuessResult, DomainError> {
        self.pipeline.resolve(session_id, guess).await
    }

    /// Full chain as of the last settled guess. Reading history does not
    /// count as activity and never waits on a guess being judged.
    pub async fn history(&self, session_id: SessionId) -> Result<GameHistory, DomainError> {
        let view = self.sessions.get(session_id)?.view();
        Ok(GameHistory {
            history: view.history,
            score: view.score,
            game_over: view.game_over,
        })
    }

    /// Popular words degrade to an empty list when the counter store is down.
    pub async fn statistics(&self) -> Statistics {
        let popular_words = self.counter.popular_words(POPULAR_WORDS).await;
        let summary = self.stats.summary();
        Statistics {
            active_sessions: self.sessions.len(),
            popular_words,
            total_games: summary.total_games,
            max_score: summary.max_score,
            average_score: summary.average_score,
        }
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.stats.leaderboard()
    }
}
