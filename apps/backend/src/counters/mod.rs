//! Global popularity counters shared by every session.

pub mod store;
pub mod word_counter;

pub use store::{CounterStore, MemoryCounterStore, RedisCounterStore};
pub use word_counter::{WordCount, WordCounter};
