//! Judgment and moderation capabilities consumed by the guess pipeline.

pub mod http;
pub mod moderation;
mod trait_def;

pub use http::{HttpOracle, HttpOracleConfig};
pub use moderation::WordFilter;
pub use trait_def::{Moderation, Moderator, Oracle, OracleError};
