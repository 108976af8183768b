//! Request-scoped trace id.
//!
//! `RequestTrace` opens the scope; error responses and log lines read it
//! back with [`trace_id`]. Work spawned onto other tasks (the verdict
//! leader, the sweeper) runs outside any scope and reports `"unknown"`.

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
