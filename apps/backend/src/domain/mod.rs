//! Game domain: word normalisation, verdicts and the per-player session
//! state machine. Nothing in here performs I/O.

pub mod persona;
pub mod session;
pub mod verdict;
pub mod words;

pub use persona::Persona;
pub use session::{Applied, GameSession, Rejection, SessionId, SessionState};
pub use verdict::{Verdict, VerdictEntry};
pub use words::{normalize_word, NormalizedGuess, WordPair, START_WORD};
