//! Time sources for the cache.
//!
//! Heat, staleness and the rotation gate all read "now" through [`Clock`], so
//! tests can pin or advance time instead of sleeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current wall-clock time in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock for deterministic tests.
///
/// Clones share the same underlying time, so a test can keep one handle while
/// the cache holds another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current_ms: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock pinned at `start`.
    #[must_use]
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            current_ms: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    /// Move the clock to `dt`.
    pub fn set(&self, dt: DateTime<Utc>) {
        self.current_ms.store(dt.timestamp_millis(), Ordering::SeqCst);
    }

    /// Advance the clock by `by`, returning the new time.
    pub fn advance(&self, by: Duration) -> DateTime<Utc> {
        self.current_ms
            .fetch_add(by.num_milliseconds(), Ordering::SeqCst);
        self.now()
    }

    /// Advance the clock by whole days.
    pub fn advance_days(&self, days: i64) -> DateTime<Utc> {
        self.advance(Duration::days(days))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.current_ms.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_is_pinned() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::at(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::at(start);
        let handle = clock.clone();

        handle.advance_days(3);
        assert_eq!(clock.now(), start + Duration::days(3));

        clock.set(start);
        assert_eq!(handle.now(), start);
    }

    #[test]
    fn test_system_clock_moves() {
        assert!(SystemClock.now().timestamp() > 0);
    }
}
