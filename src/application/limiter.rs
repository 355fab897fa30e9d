//! Minimum spacing between processed messages.
//!
//! A [`RateLimiter`] remembers when the last message was let through. The
//! lock is held across the wait, so callers sharing one limiter are
//! serialized; independent streams each get their own limiter unless
//! configured to share.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::port::outbound::clock::Clock;

/// Enforces a minimum interval between successive `acquire` calls.
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    interval: Duration,
    last: Mutex<Option<DateTime<Utc>>>,
}

impl RateLimiter {
    /// Create a limiter. The first acquire never waits.
    pub fn new(clock: Arc<dyn Clock>, interval: Duration) -> Self {
        Self {
            clock,
            interval,
            last: Mutex::new(None),
        }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the interval since the last acquire has elapsed, then
    /// record "now" as the new last-processed time.
    ///
    /// Returns how long the caller was suspended. Dropping the future
    /// mid-wait leaves the previous timestamp in place.
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last.lock().await;

        let wait = match *last {
            Some(previous) => {
                // A clock that moved backwards counts as no time elapsed.
                let elapsed = (self.clock.now() - previous)
                    .to_std()
                    .unwrap_or(Duration::ZERO);
                self.interval.saturating_sub(elapsed)
            }
            None => Duration::ZERO,
        };

        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Rate limiter delaying message");
            self.clock.sleep(wait).await;
        }

        *last = Some(self.clock.now());
        wait
    }
}
