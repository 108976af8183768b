pub mod verdict_cache;
pub mod verdict_store;

pub use verdict_cache::{CacheSource, Judged, VerdictCache};
pub use verdict_store::{MemoryVerdictStore, RedisVerdictStore, VerdictStore};
