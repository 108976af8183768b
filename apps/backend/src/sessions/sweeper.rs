use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::store::SessionStore;

/// Periodically evict idle sessions until `shutdown` is cancelled.
pub fn spawn_idle_sweeper(
    store: Arc<SessionStore>,
    max_idle: Duration,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Session sweeper stopped");
                    return;
                }
                _ = ticker.tick() => {
                    let evicted = store.evict_idle(max_idle);
                    if evicted > 0 {
                        info!(evicted, remaining = store.len(), "Evicted idle sessions");
                    } else {
                        debug!(remaining = store.len(), "Session sweep found nothing idle");
                    }
                }
            }
        }
    })
}

/// Cancel the sweeper and wait for it. Returns `false` if it panicked.
pub async fn stop_idle_sweeper(shutdown: &CancellationToken, sweeper: JoinHandle<()>) -> bool {
    shutdown.cancel();
    match sweeper.await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "Session sweeper ended abnormally");
            false
        }
    }
}
