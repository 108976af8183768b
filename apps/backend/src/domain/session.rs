//! Per-player game state machine.
//!
//! A session is `Active` until the first incorrect or duplicate guess, then
//! `Over` for good. The chain and the seen-set live together in [`Chain`]
//! so they can only grow in lockstep, which keeps
//! `history.len() == score + 1` true after every transition.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::persona::Persona;
use super::verdict::Verdict;
use super::words::NormalizedGuess;

/// Opaque session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Over,
}

/// Why a guess was refused before reaching the judge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    EmptyInput,
    SessionOver,
    DuplicateWord { guess: String },
}

/// What a definitive verdict did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub beats: bool,
    pub previous_word: String,
    pub current_word: String,
    pub score: u32,
    pub game_over: bool,
}

/// Ordered chain of played words plus the normalised set mirroring it.
#[derive(Debug, Clone)]
struct Chain {
    words: Vec<String>,
    seen: HashSet<String>,
}

impl Chain {
    fn new(start_word: &str) -> Self {
        let mut chain = Self {
            words: Vec::with_capacity(16),
            seen: HashSet::with_capacity(16),
        };
        if let Some(start) = NormalizedGuess::parse(start_word) {
            chain.push(&start);
        }
        chain
    }

    fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    fn push(&mut self, guess: &NormalizedGuess) {
        self.words.push(guess.display().to_string());
        self.seen.insert(guess.key().to_string());
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn tail(&self, count: usize) -> &[String] {
        let start = self.words.len().saturating_sub(count);
        &self.words[start..]
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    persona: Persona,
    current_word: String,
    score: u32,
    chain: Chain,
    state: SessionState,
}

impl GameSession {
    pub fn start(id: SessionId, start_word: &str, persona: Persona) -> Self {
        let chain = Chain::new(start_word);
        let current_word = chain
            .words
            .last()
            .cloned()
            .unwrap_or_else(|| start_word.to_string());
        Self {
            id,
            persona,
            current_word,
            score: 0,
            chain,
            state: SessionState::Active,
        }
    }

    /// Check a raw guess against the session without touching it.
    ///
    /// Duplicates are caught here so they never cost a judgment.
    pub fn validate(&self, raw_guess: &str) -> Result<NormalizedGuess, Rejection> {
        let guess = NormalizedGuess::parse(raw_guess).ok_or(Rejection::EmptyInput)?;
        if self.is_over() {
            return Err(Rejection::SessionOver);
        }
        if self.chain.contains(guess.key()) {
            return Err(Rejection::DuplicateWord {
                guess: guess.display().to_string(),
            });
        }
        Ok(guess)
    }

    /// Apply a definitive verdict for a guess that passed [`validate`].
    ///
    /// [`validate`]: GameSession::validate
    pub fn apply(&mut self, guess: &NormalizedGuess, verdict: &Verdict) -> Result<Applied, Rejection> {
        if self.is_over() {
            return Err(Rejection::SessionOver);
        }
        if self.chain.contains(guess.key()) {
            self.end_round();
            return Err(Rejection::DuplicateWord {
                guess: guess.display().to_string(),
            });
        }

        let previous_word = self.current_word.clone();
        if verdict.beats {
            self.chain.push(guess);
            self.score += 1;
            self.current_word = guess.display().to_string();
        } else {
            self.end_round();
        }

        debug_assert_eq!(self.chain.len(), self.score as usize + 1);

        Ok(Applied {
            beats: verdict.beats,
            previous_word,
            current_word: self.current_word.clone(),
            score: self.score,
            game_over: self.is_over(),
        })
    }

    /// Move to `Over`. Returns `true` only for the call that made the
    /// transition.
    pub fn end_round(&mut self) -> bool {
        if self.state == SessionState::Over {
            return false;
        }
        self.state = SessionState::Over;
        true
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == SessionState::Over
    }

    pub fn history(&self) -> &[String] {
        &self.chain.words
    }

    pub fn history_tail(&self, count: usize) -> &[String] {
        self.chain.tail(count)
    }
}
