//! Local word filter implementing [`Moderator`].
//!
//! Checks run cheapest first; the first failing rule decides the reason.

use async_trait::async_trait;
use lazy_regex::{lazy_regex, Lazy};
use regex::Regex;

use super::trait_def::{Moderation, Moderator};

const MIN_LEN: usize = 2;
const MAX_WORD_LEN: usize = 30;
const MAX_REPEAT: usize = 5;
const MAX_SPECIAL_RATIO: f64 = 0.5;

const INAPPROPRIATE: &str = "Content contains inappropriate language";

const PROFANITY: &[&str] = &[
    "ass", "asshole", "bitch", "bullshit", "crap", "cunt", "damn", "dick", "fuck", "piss",
    "shit", "slut", "whore",
];

static EVASION: Lazy<Regex> = lazy_regex!(
    r"f+[^a-z]*u+[^a-z]*c+[^a-z]*k+|s+[^a-z\s]*h+[^a-z\s]*i+[^a-z\s]*t+|b+[^a-z]*i+[^a-z]*t+[^a-z]*c+[^a-z]*h+"
);

static INJECTION: Lazy<Regex> = lazy_regex!(
    r"ignore (previous|above|all) instructions|disregard .*? instructions|do not (follow|adhere to) .*? (instructions|rules)|new instructions|your (real|actual) purpose|you (are|will) (now|actually) (act|work) as|system (prompt|message|instruction)"
);

#[derive(Debug, Default, Clone, Copy)]
pub struct WordFilter;

impl WordFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, text: &str) -> Moderation {
        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_LEN {
            return Moderation::Rejected("Content is too short".to_string());
        }

        let lower = trimmed.to_lowercase();

        if INJECTION.is_match(&lower) {
            return Moderation::Rejected("Potential prompt injection attempt detected".to_string());
        }

        if contains_profanity(&lower) || EVASION.is_match(&lower) {
            return Moderation::Rejected(INAPPROPRIATE.to_string());
        }

        let total = trimmed.chars().count();
        let special = trimmed
            .chars()
            .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
            .count();
        if special as f64 / total as f64 > MAX_SPECIAL_RATIO {
            return Moderation::Rejected("Content contains too many special characters".to_string());
        }

        if has_run(trimmed, MAX_REPEAT) {
            return Moderation::Rejected("Content contains repetitive patterns".to_string());
        }

        if lower
            .split_whitespace()
            .any(|word| word.chars().count() > MAX_WORD_LEN)
        {
            return Moderation::Rejected("Content contains suspiciously long words".to_string());
        }

        Moderation::Allowed
    }
}

#[async_trait]
impl Moderator for WordFilter {
    async fn moderate(&self, text: &str) -> Moderation {
        self.check(text)
    }
}

/// Leetspeak back to letters, so `sh1t` and `$hit` compare equal to `shit`.
fn fold_leet(c: char) -> char {
    match c {
        '@' | '4' => 'a',
        '8' => 'b',
        '3' => 'e',
        '1' | '!' => 'i',
        '0' => 'o',
        '5' | '$' => 's',
        '7' => 't',
        other => other,
    }
}

fn contains_profanity(lower: &str) -> bool {
    let folded: String = lower.chars().map(fold_leet).collect();
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .any(|token| PROFANITY.contains(&token))
}

fn has_run(text: &str, len: usize) -> bool {
    let mut previous = None;
    let mut run = 0;
    for c in text.chars() {
        if Some(c) == previous {
            run += 1;
        } else {
            previous = Some(c);
            run = 1;
        }
        if run >= len {
            return true;
        }
    }
    false
}
