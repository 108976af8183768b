pub mod game;
pub mod guess_pipeline;
pub mod stats;

pub use game::{GameHistory, GameService, StartedGame, Statistics};
pub use guess_pipeline::{GuessOutcome, GuessPipeline, GuessResult};
pub use stats::{GameStats, LeaderboardEntry};
