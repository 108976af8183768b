//! Where settled verdicts live.
//!
//! Both backends are first-writer-wins: once a pair has an entry, later
//! writes return the existing entry untouched.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::domain::{VerdictEntry, WordPair};
use crate::infra::StoreError;

#[async_trait]
pub trait VerdictStore: Send + Sync {
    async fn get(&self, pair: &WordPair) -> Result<Option<VerdictEntry>, StoreError>;

    /// Store `entry` unless the pair already has one; returns whichever
    /// entry is canonical afterwards.
    async fn put_if_absent(
        &self,
        pair: &WordPair,
        entry: VerdictEntry,
    ) -> Result<VerdictEntry, StoreError>;

    fn backend(&self) -> &'static str;
}

/// Process-local store bounded by capacity and time-to-live.
pub struct MemoryVerdictStore {
    entries: Cache<WordPair, VerdictEntry>,
}

impl MemoryVerdictStore {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

#[async_trait]
impl VerdictStore for MemoryVerdictStore {
    async fn get(&self, pair: &WordPair) -> Result<Option<VerdictEntry>, StoreError> {
        Ok(self.entries.get(pair).await)
    }

    async fn put_if_absent(
        &self,
        pair: &WordPair,
        entry: VerdictEntry,
    ) -> Result<VerdictEntry, StoreError> {
        let stored = self
            .entries
            .entry(pair.clone())
            .or_insert(entry)
            .await
            .into_value();
        Ok(stored)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Shared store at `verdict:<current>:<candidate>`, JSON encoded.
pub struct RedisVerdictStore {
    conn: ConnectionManager,
    ttl_secs: u64,
}

impl RedisVerdictStore {
    pub fn new(conn: ConnectionManager, ttl: Duration) -> Self {
        Self {
            conn,
            ttl_secs: ttl.as_secs().max(1),
        }
    }

    pub fn key(pair: &WordPair) -> String {
        format!("verdict:{pair}")
    }
}

#[async_trait]
impl VerdictStore for RedisVerdictStore {
    async fn get(&self, pair: &WordPair) -> Result<Option<VerdictEntry>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(Self::key(pair)).await?;
        raw.map(|json| serde_json::from_str(&json).map_err(StoreError::from))
            .transpose()
    }

    async fn put_if_absent(
        &self,
        pair: &WordPair,
        entry: VerdictEntry,
    ) -> Result<VerdictEntry, StoreError> {
        let key = Self::key(pair);
        let json = serde_json::to_string(&entry)?;
        let mut conn = self.conn.clone();

        let written: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&json)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async(&mut conn)
            .await?;

        if written.is_some() {
            return Ok(entry);
        }

        // Lost the race; the winner's entry is canonical.
        let existing: Option<String> = conn.get(&key).await?;
        match existing {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(entry),
        }
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
