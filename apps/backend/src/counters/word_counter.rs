use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::store::CounterStore;
use crate::domain::{normalize_word, WordPair};
use crate::infra::{StoreError, WarnThrottle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

/// Word and pair popularity, normalised before touching the store.
#[derive(Clone)]
pub struct WordCounter {
    store: Arc<dyn CounterStore>,
    warn: Arc<WarnThrottle>,
}

impl WordCounter {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self {
            store,
            warn: Arc::new(WarnThrottle::default()),
        }
    }

    pub async fn increment_word(&self, word: &str) -> Result<u64, StoreError> {
        self.store.incr_word(&normalize_word(word)).await
    }

    pub async fn increment_pair(&self, current: &str, candidate: &str) -> Result<u64, StoreError> {
        self.store.incr_pair(&WordPair::new(current, candidate)).await
    }

    pub async fn word_count(&self, word: &str) -> Result<u64, StoreError> {
        self.store.word_count(&normalize_word(word)).await
    }

    pub async fn pair_count(&self, current: &str, candidate: &str) -> Result<u64, StoreError> {
        self.store.pair_count(&WordPair::new(current, candidate)).await
    }

    pub async fn top_words(&self, limit: usize) -> Result<Vec<WordCount>, StoreError> {
        let rows = self.store.top_words(limit).await?;
        Ok(rows
            .into_iter()
            .map(|(word, count)| WordCount { word, count })
            .collect())
    }

    /// Count a judged guess: the word always, the pair only when it won.
    /// Store failures are logged and swallowed.
    pub async fn record_guess(&self, previous_word: &str, candidate: &str, beats: bool) {
        if let Err(err) = self.increment_word(candidate).await {
            self.log_failure(&err, "increment word");
        }
        if beats {
            if let Err(err) = self.increment_pair(previous_word, candidate).await {
                self.log_failure(&err, "increment pair");
            }
        }
    }

    /// Count for display; `0` when the store can't answer.
    pub async fn word_count_or_zero(&self, word: &str) -> u64 {
        match self.word_count(word).await {
            Ok(count) => count,
            Err(err) => {
                self.log_failure(&err, "read word count");
                0
            }
        }
    }

    /// Top words for display; empty when the store can't answer.
    pub async fn popular_words(&self, limit: usize) -> Vec<WordCount> {
        match self.top_words(limit).await {
            Ok(words) => words,
            Err(err) => {
                self.log_failure(&err, "read top words");
                Vec::new()
            }
        }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    fn log_failure(&self, err: &StoreError, op: &'static str) {
        if self.warn.should_log() {
            warn!(error = %err, op, backend = self.store.backend(), "Counter store failed");
        }
    }
}
