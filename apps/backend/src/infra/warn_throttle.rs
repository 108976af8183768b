use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Rate limit for repetitive warnings, e.g. "Redis is down" on every guess.
#[derive(Debug)]
pub struct WarnThrottle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl WarnThrottle {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// `true` at most once per interval.
    pub fn should_log(&self) -> bool {
        let now = Instant::now();
        let mut last = self.last.lock();
        match *last {
            Some(at) if now.duration_since(at) < self.interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

impl Default for WarnThrottle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
