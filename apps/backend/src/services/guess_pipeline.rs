//! One guess, end to end.
//!
//! The session lock is held from validation until the verdict is applied,
//! judgment included, so two guesses for the same session can never
//! interleave. Counters and statistics are updated after the lock is
//! released. Nothing is mutated unless the judge gave a definitive answer.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::stats::GameStats;
use crate::cache::VerdictCache;
use crate::counters::WordCounter;
use crate::domain::{GameSession, NormalizedGuess, Rejection, SessionId, Verdict};
use crate::errors::domain::DomainError;
use crate::oracle::{Moderation, Moderator};
use crate::sessions::SessionStore;

/// Entries of history returned with a guess that did not end the game.
pub const HISTORY_TAIL: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GuessOutcome {
    Correct,
    Incorrect,
    DuplicateWord,
    SessionOver,
    EmptyInput,
    ContentRejected { reason: String },
    OracleUnavailable,
}

impl GuessOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuessOutcome::Correct => "correct",
            GuessOutcome::Incorrect => "incorrect",
            GuessOutcome::DuplicateWord => "duplicate_word",
            GuessOutcome::SessionOver => "session_over",
            GuessOutcome::EmptyInput => "empty_input",
            GuessOutcome::ContentRejected { .. } => "content_rejected",
            GuessOutcome::OracleUnavailable => "oracle_unavailable",
        }
    }

    /// The player may send the same guess again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GuessOutcome::OracleUnavailable
                | GuessOutcome::ContentRejected { .. }
                | GuessOutcome::EmptyInput
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GuessResult {
    pub outcome: GuessOutcome,
    pub accepted: bool,
    /// The same guess may be sent again.
    pub retryable: bool,
    pub message: String,
    pub new_word: Option<String>,
    pub current_word: String,
    pub score: u32,
    /// Last few words, or the whole chain once the game is over.
    pub history: Vec<String>,
    pub game_over: bool,
    pub feedback: Option<String>,
    pub word_count_message: String,
}

impl GuessResult {
    fn from_session(session: &GameSession, outcome: GuessOutcome, message: String) -> Self {
        let history = if session.is_over() {
            session.history().to_vec()
        } else {
            session.history_tail(HISTORY_TAIL).to_vec()
        };
        Self {
            accepted: outcome == GuessOutcome::Correct,
            retryable: outcome.is_retryable(),
            outcome,
            message,
            new_word: None,
            current_word: session.current_word().to_string(),
            score: session.score(),
            history,
            game_over: session.is_over(),
            feedback: None,
            word_count_message: String::new(),
        }
    }
}

pub fn word_count_message(word: &str, count: u64) -> String {
    format!("{word} → {count} total guesses so far")
}

#[derive(Clone)]
pub struct GuessPipeline {
    sessions: Arc<SessionStore>,
    verdicts: VerdictCache,
    counter: WordCounter,
    moderator: Arc<dyn Moderator>,
    stats: Arc<GameStats>,
}

/// What happened under the session lock, for the bookkeeping after it.
struct Settled {
    result: GuessResult,
    counted: Option<(String, String, bool)>,
    finished_score: Option<u32>,
}

impl GuessPipeline {
    pub fn new(
        sessions: Arc<SessionStore>,
        verdicts: VerdictCache,
        counter: WordCounter,
        moderator: Arc<dyn Moderator>,
        stats: Arc<GameStats>,
    ) -> Self {
        Self {
            sessions,
            verdicts,
            counter,
            moderator,
            stats,
        }
    }

    /// Only an unknown or evicted session is an error; every gameplay
    /// rejection comes back as a [`GuessOutcome`].
    pub async fn resolve(
        &self,
        session_id: SessionId,
        raw_guess: &str,
    ) -> Result<GuessResult, DomainError> {
        let handle = self.sessions.get(session_id)?;
        handle.touch();

        let settled = {
            let mut session = handle.lock().await;
            let settled = self.settle(&mut session, raw_guess).await;
            handle.publish(&session);
            settled
        };

        let Settled {
            mut result,
            counted,
            finished_score,
        } = settled;

        if let Some((previous, candidate, beats)) = counted {
            self.counter.record_guess(&previous, &candidate, beats).await;
            handle.touch();
        }
        if let Some(score) = finished_score {
            self.stats.record_finished(score);
        }

        let count = self.counter.word_count_or_zero(&result.current_word).await;
        result.word_count_message = word_count_message(&result.current_word, count);

        info!(
            session_id = %session_id,
            outcome = result.outcome.as_str(),
            score = result.score,
            game_over = result.game_over,
            "Guess resolved"
        );
        Ok(result)
    }

    async fn settle(&self, session: &mut GameSession, raw_guess: &str) -> Settled {
        let guess = match session.validate(raw_guess) {
            Ok(guess) => guess,
            Err(rejection) => return reject(session, rejection),
        };

        if let Moderation::Rejected(reason) = self.moderator.moderate(guess.display()).await {
            debug!(session_id = %session.id(), reason = %reason, "Guess rejected by moderation");
            let message = format!("That guess was rejected: {reason}");
            return unchanged(GuessResult::from_session(
                session,
                GuessOutcome::ContentRejected { reason },
                message,
            ));
        }

        let judged = match self
            .verdicts
            .judge(session.current_word(), guess.display(), session.persona())
            .await
        {
            Ok(judged) => judged,
            Err(err) => {
                warn!(session_id = %session.id(), error = %err, "Judge unavailable; guess not consumed");
                return unchanged(GuessResult::from_session(
                    session,
                    GuessOutcome::OracleUnavailable,
                    "The judge is unavailable right now. Please try again.".to_string(),
                ));
            }
        };
        debug!(session_id = %session.id(), cache = judged.source.as_str(), "Verdict obtained");

        apply_verdict(session, &guess, judged.verdict)
    }
}

fn unchanged(result: GuessResult) -> Settled {
    Settled {
        result,
        counted: None,
        finished_score: None,
    }
}

fn reject(session: &mut GameSession, rejection: Rejection) -> Settled {
    match rejection {
        Rejection::EmptyInput => unchanged(GuessResult::from_session(
            session,
            GuessOutcome::EmptyInput,
            "Guess cannot be empty.".to_string(),
        )),
        Rejection::SessionOver => unchanged(GuessResult::from_session(
            session,
            GuessOutcome::SessionOver,
            "Game is already over. Start a new game.".to_string(),
        )),
        Rejection::DuplicateWord { guess } => {
            let newly_over = session.end_round();
            let result = GuessResult::from_session(
                session,
                GuessOutcome::DuplicateWord,
                format!("Game over! '{guess}' has already been used in this game."),
            );
            Settled {
                result,
                counted: None,
                finished_score: newly_over.then(|| session.score()),
            }
        }
    }
}

fn apply_verdict(
    session: &mut GameSession,
    guess: &NormalizedGuess,
    verdict: Verdict,
) -> Settled {
    let was_over = session.is_over();
    let applied = match session.apply(guess, &verdict) {
        Ok(applied) => applied,
        Err(rejection) => {
            let mut settled = reject(session, rejection);
            if !was_over && session.is_over() {
                settled.finished_score = Some(session.score());
            }
            return settled;
        }
    };

    let (outcome, message) = if applied.beats {
        (
            GuessOutcome::Correct,
            format!(
                "Correct! '{}' beats '{}'. What beats {}?",
                guess.display(),
                applied.previous_word,
                guess.display()
            ),
        )
    } else {
        (
            GuessOutcome::Incorrect,
            format!(
                "Game over! '{}' doesn't beat '{}'.",
                guess.display(),
                applied.previous_word
            ),
        )
    };

    let mut result = GuessResult::from_session(session, outcome, message);
    result.feedback = Some(verdict.feedback);
    if applied.beats {
        result.new_word = Some(applied.current_word.clone());
    }

    Settled {
        result,
        counted: Some((
            applied.previous_word,
            guess.key().to_string(),
            applied.beats,
        )),
        finished_score: applied.game_over.then_some(applied.score),
    }
}
