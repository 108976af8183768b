use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The judge's answer for one (current, candidate) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub beats: bool,
    pub feedback: String,
}

impl Verdict {
    pub fn new(beats: bool, feedback: impl Into<String>) -> Self {
        Self {
            beats,
            feedback: feedback.into(),
        }
    }

    /// Feedback used when the judge answers without any explanation.
    pub fn fallback_feedback(current_word: &str, candidate: &str, beats: bool) -> String {
        if beats {
            format!("Correct! '{candidate}' beats '{current_word}'.")
        } else {
            format!("Incorrect! '{candidate}' does not beat '{current_word}'.")
        }
    }
}

/// Cached verdict. Written once per pair and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictEntry {
    pub beats: bool,
    pub feedback: String,
    #[serde(with = "time::serde::rfc3339")]
    pub computed_at: OffsetDateTime,
}

impl VerdictEntry {
    pub fn new(verdict: Verdict) -> Self {
        Self {
            beats: verdict.beats,
            feedback: verdict.feedback,
            computed_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::new(self.beats, self.feedback.clone())
    }
}
