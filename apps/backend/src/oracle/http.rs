//! Judgment service client.
//!
//! `POST {base_url}/judge` with `{current_word, candidate_word, persona}`,
//! answered by `{beats, feedback}`. Connection failures are retried with a
//! capped, jittered backoff; anything the service actually answered with is
//! final.

use std::time::Duration;

use async_trait::async_trait;
use rand::random;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::trait_def::{Oracle, OracleError};
use crate::domain::{Persona, Verdict};

const INITIAL_RETRY_DELAY_MS: u64 = 50;
const MAX_RETRY_DELAY_MS: u64 = 200;
const JITTER_PERCENT: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct HttpOracleConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub max_attempts: u32,
}

pub struct HttpOracle {
    client: reqwest::Client,
    judge_url: String,
    max_attempts: u32,
}

#[derive(Serialize)]
struct JudgeRequest<'a> {
    current_word: &'a str,
    candidate_word: &'a str,
    persona: Persona,
}

#[derive(Deserialize)]
struct JudgeResponse {
    beats: bool,
    #[serde(default)]
    feedback: Option<String>,
}

impl HttpOracle {
    pub fn new(config: HttpOracleConfig) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| OracleError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            judge_url: format!("{}/judge", config.base_url.trim_end_matches('/')),
            max_attempts: config.max_attempts.max(1),
        })
    }

    async fn judge_once(&self, body: &JudgeRequest<'_>) -> Result<JudgeResponse, OracleError> {
        let response = self
            .client
            .post(&self.judge_url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Malformed(format!("status {status}")));
        }

        response
            .json::<JudgeResponse>()
            .await
            .map_err(|err| OracleError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn judge(
        &self,
        current_word: &str,
        candidate: &str,
        persona: Persona,
    ) -> Result<Verdict, OracleError> {
        let body = JudgeRequest {
            current_word,
            candidate_word: candidate,
            persona,
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.judge_once(&body).await {
                Ok(answer) => {
                    debug!(current_word, candidate, attempt, beats = answer.beats, "Oracle answered");
                    let feedback = answer
                        .feedback
                        .filter(|text| !text.trim().is_empty())
                        .unwrap_or_else(|| {
                            Verdict::fallback_feedback(current_word, candidate, answer.beats)
                        });
                    return Ok(Verdict::new(answer.beats, feedback));
                }
                Err(err) => {
                    if attempt >= self.max_attempts || !err.is_transient() {
                        return Err(err);
                    }
                    let delay = retry_delay(attempt);
                    warn!(
                        error = %err,
                        attempt,
                        retry_delay_ms = delay.as_millis() as u64,
                        "Oracle request failed, retrying"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> OracleError {
    if err.is_timeout() {
        OracleError::Timeout
    } else if err.is_decode() {
        OracleError::Malformed(err.to_string())
    } else {
        OracleError::Transport(err.to_string())
    }
}

fn retry_delay(attempt: u32) -> Duration {
    let base = INITIAL_RETRY_DELAY_MS
        .saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1)))
        .min(MAX_RETRY_DELAY_MS) as f64;
    let jitter = (random::<f64>() * 2.0 - 1.0) * base * JITTER_PERCENT;
    Duration::from_millis((base + jitter).max(1.0) as u64)
}
