#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod cache;
pub mod config;
pub mod counters;
pub mod domain;
pub mod error;
pub mod errors;
pub mod infra;
pub mod middleware;
pub mod oracle;
pub mod routes;
pub mod services;
pub mod sessions;
pub mod state;
pub mod trace_ctx;

pub use cache::VerdictCache;
pub use config::GameConfig;
pub use counters::WordCounter;
pub use error::AppError;
pub use infra::state::{build_state, StateBuilder};
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use middleware::trace_span::TraceSpan;
pub use services::{GameService, GuessOutcome, GuessPipeline, GuessResult};
pub use sessions::SessionStore;
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
