//! Memoised judgments with in-flight collapsing.
//!
//! Lookups go store first. On a miss the caller either joins the judgment
//! already running for that pair or starts one. The judgment runs on its
//! own task so it finishes (and fills the store) even if every waiting
//! request is dropped. Each in-flight slot is tagged with an attempt number
//! so a finishing task only clears its own slot.
//!
//! Failures are handed to every waiter of that attempt and are not stored;
//! the next lookup starts a fresh attempt.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::{Persona, Verdict, VerdictEntry, WordPair};
use crate::infra::WarnThrottle;
use crate::oracle::{Oracle, OracleError};

use super::verdict_store::VerdictStore;

type SharedJudgment = Shared<BoxFuture<'static, Result<Verdict, OracleError>>>;

/// How a verdict was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
    /// Already stored.
    Hit,
    /// Joined a judgment another caller started.
    Collapsed,
    /// Started the judgment.
    Miss,
}

impl CacheSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheSource::Hit => "hit",
            CacheSource::Collapsed => "collapsed",
            CacheSource::Miss => "miss",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judged {
    pub verdict: Verdict,
    pub source: CacheSource,
}

struct InFlight {
    attempt: u64,
    judgment: SharedJudgment,
}

struct Inner {
    store: Arc<dyn VerdictStore>,
    oracle: Arc<dyn Oracle>,
    inflight: DashMap<WordPair, InFlight>,
    next_attempt: AtomicU64,
    oracle_timeout: Duration,
    store_warn: WarnThrottle,
}

#[derive(Clone)]
pub struct VerdictCache {
    inner: Arc<Inner>,
}

impl VerdictCache {
    pub fn new(
        store: Arc<dyn VerdictStore>,
        oracle: Arc<dyn Oracle>,
        oracle_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                oracle,
                inflight: DashMap::new(),
                next_attempt: AtomicU64::new(1),
                oracle_timeout,
                store_warn: WarnThrottle::default(),
            }),
        }
    }

    /// Verdict for `candidate` against `current_word`.
    ///
    /// The words are passed to the oracle as given; the cache key is their
    /// normalised pair. `persona` only shapes a fresh judgment.
    pub async fn judge(
        &self,
        current_word: &str,
        candidate: &str,
        persona: Persona,
    ) -> Result<Judged, OracleError> {
        let pair = WordPair::new(current_word, candidate);

        if let Some(entry) = self.inner.lookup(&pair).await {
            debug!(pair = %pair, cache = CacheSource::Hit.as_str(), "Verdict served from store");
            return Ok(Judged {
                verdict: entry.verdict(),
                source: CacheSource::Hit,
            });
        }

        let (judgment, source) = match self.inner.inflight.entry(pair.clone()) {
            Entry::Occupied(slot) => (slot.get().judgment.clone(), CacheSource::Collapsed),
            Entry::Vacant(slot) => {
                let attempt = self.inner.next_attempt.fetch_add(1, Ordering::Relaxed);
                let judgment = spawn_judgment(
                    Arc::clone(&self.inner),
                    pair.clone(),
                    current_word.to_string(),
                    candidate.to_string(),
                    persona,
                    attempt,
                );
                slot.insert(InFlight {
                    attempt,
                    judgment: judgment.clone(),
                });
                (judgment, CacheSource::Miss)
            }
        };

        debug!(pair = %pair, cache = source.as_str(), "Awaiting judgment");
        let verdict = judgment.await?;
        Ok(Judged { verdict, source })
    }

    /// Number of judgments currently running.
    pub fn inflight_len(&self) -> usize {
        self.inner.inflight.len()
    }

    pub fn store_backend(&self) -> &'static str {
        self.inner.store.backend()
    }
}

impl Inner {
    /// Store read; a failing store reads as a miss.
    async fn lookup(&self, pair: &WordPair) -> Option<VerdictEntry> {
        match self.store.get(pair).await {
            Ok(entry) => entry,
            Err(err) => {
                if self.store_warn.should_log() {
                    warn!(error = %err, backend = self.store.backend(), "Verdict store read failed; treating as miss");
                }
                None
            }
        }
    }

    async fn remember(&self, pair: &WordPair, verdict: Verdict) -> Verdict {
        match self
            .store
            .put_if_absent(pair, VerdictEntry::new(verdict.clone()))
            .await
        {
            Ok(stored) => stored.verdict(),
            Err(err) => {
                if self.store_warn.should_log() {
                    warn!(error = %err, backend = self.store.backend(), "Verdict store write failed");
                }
                verdict
            }
        }
    }

    fn release(&self, pair: &WordPair, attempt: u64) {
        self.inflight
            .remove_if(pair, |_, slot| slot.attempt == attempt);
    }
}

fn spawn_judgment(
    inner: Arc<Inner>,
    pair: WordPair,
    current_word: String,
    candidate: String,
    persona: Persona,
    attempt: u64,
) -> SharedJudgment {
    let task = tokio::spawn(async move {
        let result = run_judgment(&inner, &pair, &current_word, &candidate, persona).await;
        inner.release(&pair, attempt);
        result
    });

    async move {
        match task.await {
            Ok(result) => result,
            Err(err) => Err(OracleError::Transport(format!("judgment task failed: {err}"))),
        }
    }
    .boxed()
    .shared()
}

async fn run_judgment(
    inner: &Inner,
    pair: &WordPair,
    current_word: &str,
    candidate: &str,
    persona: Persona,
) -> Result<Verdict, OracleError> {
    // A previous attempt may have stored the pair between our caller's
    // lookup and this slot being claimed.
    if let Some(entry) = inner.lookup(pair).await {
        return Ok(entry.verdict());
    }

    let started = Instant::now();
    let outcome = timeout(
        inner.oracle_timeout,
        inner.oracle.judge(current_word, candidate, persona),
    )
    .await
    .unwrap_or(Err(OracleError::Timeout));
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(verdict) => {
            debug!(pair = %pair, elapsed_ms, beats = verdict.beats, "Oracle judged pair");
            Ok(inner.remember(pair, verdict).await)
        }
        Err(err) => {
            warn!(pair = %pair, elapsed_ms, error = %err, "Oracle judgment failed");
            Err(err)
        }
    }
}
