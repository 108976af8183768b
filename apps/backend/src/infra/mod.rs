//! Infrastructure: Redis connectivity, store errors and state wiring.

pub mod redis_conn;
pub mod state;
pub mod store_error;
pub mod warn_throttle;

pub use store_error::StoreError;
pub use warn_throttle::WarnThrottle;
