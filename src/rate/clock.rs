//! Time sources for window arithmetic.
//!
//! Timers always run on tokio's timer wheel. The clock only answers "what
//! time is it now" so the throttler can measure how much of the current
//! window remains.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of millisecond timestamps.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds. Only differences between readings matter.
    fn now_millis(&self) -> i64;
}

/// Wall clock, milliseconds since the Unix epoch.
///
/// Can jump backwards when the system time is adjusted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as i64,
            Err(before_epoch) => -(before_epoch.duration().as_millis() as i64),
        }
    }
}

/// Monotonic clock backed by `tokio::time::Instant`.
///
/// Follows paused and advanced time in tokio's test utilities, which makes it
/// the clock of choice when replaying call traces.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_millis(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_millis)),
        }
    }

    /// Jump to an absolute reading, forwards or backwards.
    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_manual_clock_moves_both_ways() {
        let clock = ManualClock::new(1_000);
        let shared = clock.clone();

        clock.advance(250);
        assert_eq!(shared.now_millis(), 1_250);

        shared.set(400);
        assert_eq!(clock.now_millis(), 400);
    }

    #[test]
    fn test_system_clock_is_past_epoch() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let clock = TokioClock::new();
        assert_eq!(clock.now_millis(), 0);

        tokio::time::advance(Duration::from_millis(75)).await;
        assert_eq!(clock.now_millis(), 75);
    }
}
