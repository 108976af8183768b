use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::domain::WordPair;
use crate::infra::StoreError;

const WORD_COUNTS_KEY: &str = "word_counts";

/// Monotonic counters keyed by normalised word and by ordered word pair.
///
/// Increments are atomic per key and return the new value.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn incr_word(&self, word: &str) -> Result<u64, StoreError>;
    async fn incr_pair(&self, pair: &WordPair) -> Result<u64, StoreError>;
    async fn word_count(&self, word: &str) -> Result<u64, StoreError>;
    async fn pair_count(&self, pair: &WordPair) -> Result<u64, StoreError>;
    /// Highest counts first; ties broken by word.
    async fn top_words(&self, limit: usize) -> Result<Vec<(String, u64)>, StoreError>;
    fn backend(&self) -> &'static str;
}

#[derive(Default)]
pub struct MemoryCounterStore {
    words: DashMap<String, AtomicU64>,
    pairs: DashMap<WordPair, AtomicU64>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn bump<K>(map: &DashMap<K, AtomicU64>, key: &K) -> u64
where
    K: std::hash::Hash + Eq + Clone,
{
    // Fast path under the shard read lock; insert only for new keys.
    if let Some(counter) = map.get(key) {
        return counter.fetch_add(1, Ordering::AcqRel) + 1;
    }
    map.entry(key.clone())
        .or_insert_with(|| AtomicU64::new(0))
        .fetch_add(1, Ordering::AcqRel)
        + 1
}

fn read<K>(map: &DashMap<K, AtomicU64>, key: &K) -> u64
where
    K: std::hash::Hash + Eq,
{
    map.get(key)
        .map(|counter| counter.load(Ordering::Acquire))
        .unwrap_or(0)
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn incr_word(&self, word: &str) -> Result<u64, StoreError> {
        Ok(bump(&self.words, &word.to_string()))
    }

    async fn incr_pair(&self, pair: &WordPair) -> Result<u64, StoreError> {
        Ok(bump(&self.pairs, pair))
    }

    async fn word_count(&self, word: &str) -> Result<u64, StoreError> {
        Ok(read(&self.words, &word.to_string()))
    }

    async fn pair_count(&self, pair: &WordPair) -> Result<u64, StoreError> {
        Ok(read(&self.pairs, pair))
    }

    async fn top_words(&self, limit: usize) -> Result<Vec<(String, u64)>, StoreError> {
        let mut all: Vec<(String, u64)> = self
            .words
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Acquire)))
            .collect();
        all.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        all.truncate(limit);
        Ok(all)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Word counts in the `word_counts` sorted set, pair counts at
/// `pair_count:<a>:<b>`.
pub struct RedisCounterStore {
    conn: ConnectionManager,
}

impl RedisCounterStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    pub fn pair_key(pair: &WordPair) -> String {
        format!("pair_count:{pair}")
    }
}

fn score_to_count(score: f64) -> u64 {
    if score.is_finite() && score > 0.0 {
        score.round() as u64
    } else {
        0
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr_word(&self, word: &str) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let score: f64 = conn.zincr(WORD_COUNTS_KEY, word, 1).await?;
        Ok(score_to_count(score))
    }

    async fn incr_pair(&self, pair: &WordPair) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let count: u64 = conn.incr(Self::pair_key(pair), 1).await?;
        Ok(count)
    }

    async fn word_count(&self, word: &str) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let score: Option<f64> = conn.zscore(WORD_COUNTS_KEY, word).await?;
        Ok(score.map(score_to_count).unwrap_or(0))
    }

    async fn pair_count(&self, pair: &WordPair) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let count: Option<u64> = conn.get(Self::pair_key(pair)).await?;
        Ok(count.unwrap_or(0))
    }

    async fn top_words(&self, limit: usize) -> Result<Vec<(String, u64)>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let stop = isize::try_from(limit).unwrap_or(isize::MAX) - 1;
        let rows: Vec<(String, f64)> = conn
            .zrevrange_withscores(WORD_COUNTS_KEY, 0, stop)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(word, score)| (word, score_to_count(score)))
            .collect())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
