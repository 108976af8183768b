//! Word normalisation and the keys derived from it.
//!
//! Two spellings of a word are the same word when they normalise to the
//! same string: surrounding whitespace trimmed, inner whitespace runs
//! collapsed to one space, Unicode NFKC applied, then lowercased.

use std::borrow::Cow;
use std::fmt;

use unicode_normalization::UnicodeNormalization;

/// Every session starts from this word.
pub const START_WORD: &str = "Rock";

/// Normalize a word for comparison, deduplication and keying.
pub fn normalize_word(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    collapsed.as_str().nfkc().collect::<String>().to_lowercase()
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A guess that passed validation.
///
/// `display` keeps the player's casing (whitespace tidied) and is what the
/// chain shows; `key` is the normalised form used for duplicate checks,
/// cache keys and counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedGuess {
    display: String,
    key: String,
}

impl NormalizedGuess {
    /// Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let display = collapse_whitespace(raw);
        if display.is_empty() {
            return None;
        }
        let key = display.as_str().nfkc().collect::<String>().to_lowercase();
        Some(Self { display, key })
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Ordered pair of normalised words: `candidate` is proposed to beat
/// `current`.
///
/// Keys both the verdict cache and the pair counters. Renders as
/// `"<current>:<candidate>"`, with `%` and `:` inside a word
/// percent-encoded so distinct pairs never render alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordPair {
    current: String,
    candidate: String,
}

impl WordPair {
    pub fn new(current: &str, candidate: &str) -> Self {
        Self {
            current: normalize_word(current),
            candidate: normalize_word(candidate),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn candidate(&self) -> &str {
        &self.candidate
    }
}

fn escape_key_part(word: &str) -> Cow<'_, str> {
    if word.contains(['%', ':']) {
        Cow::Owned(word.replace('%', "%25").replace(':', "%3A"))
    } else {
        Cow::Borrowed(word)
    }
}

impl fmt::Display for WordPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            escape_key_part(&self.current),
            escape_key_part(&self.candidate)
        )
    }
}
