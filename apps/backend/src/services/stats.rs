//! Aggregates over finished games.

use parking_lot::Mutex;
use serde::Serialize;
use time::OffsetDateTime;

const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_games: u64,
    pub max_score: u32,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub position: usize,
    pub score: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
}

#[derive(Debug, Default)]
struct Totals {
    games: u64,
    score_sum: u64,
    max_score: u32,
    /// Sorted by score descending; earlier finishes win ties.
    top: Vec<(u32, OffsetDateTime)>,
}

#[derive(Debug, Default)]
pub struct GameStats {
    totals: Mutex<Totals>,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished game. Callers make sure each session is
    /// recorded once.
    pub fn record_finished(&self, score: u32) {
        self.record_finished_at(score, OffsetDateTime::now_utc());
    }

    fn record_finished_at(&self, score: u32, finished_at: OffsetDateTime) {
        let mut totals = self.totals.lock();
        totals.games += 1;
        totals.score_sum += u64::from(score);
        totals.max_score = totals.max_score.max(score);

        let at = totals
            .top
            .iter()
            .position(|(existing, _)| *existing < score)
            .unwrap_or(totals.top.len());
        if at < LEADERBOARD_SIZE {
            totals.top.insert(at, (score, finished_at));
            totals.top.truncate(LEADERBOARD_SIZE);
        }
    }

    pub fn summary(&self) -> StatsSummary {
        let totals = self.totals.lock();
        let average_score = if totals.games == 0 {
            0.0
        } else {
            totals.score_sum as f64 / totals.games as f64
        };
        StatsSummary {
            total_games: totals.games,
            max_score: totals.max_score,
            average_score,
        }
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.totals
            .lock()
            .top
            .iter()
            .enumerate()
            .map(|(idx, (score, finished_at))| LeaderboardEntry {
                position: idx + 1,
                score: *score,
                finished_at: *finished_at,
            })
            .collect()
    }
}
