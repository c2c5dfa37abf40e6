use std::thread;
use std::time::{Duration, Instant};

/// Monotonic clock used to pace the cooperative scheduler in real time.
///
/// - now(): returns a monotonic Instant
/// - sleep(): sleeps for the provided duration (implementations may simulate)
/// - sleep_until(): sleeps until `deadline`, returning immediately when late
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);

    /// Sleep until `deadline`; returns how far behind schedule the caller was.
    fn sleep_until(&self, deadline: Instant) -> Duration {
        let now = self.now();
        if deadline > now {
            self.sleep(deadline - now);
            Duration::ZERO
        } else {
            now - deadline
        }
    }
}

/// Real-time monotonic clock backed by std::time::Instant.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

/// Deterministic clock whose time only moves when slept on or advanced.
///
/// now() = origin + offset; sleep(d) advances the offset without blocking.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: std::sync::Arc<std::sync::Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: std::sync::Arc::new(std::sync::Mutex::new(Duration::ZERO)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = off.saturating_add(d);
        }
    }

    /// Total time slept or advanced since construction.
    pub fn elapsed(&self) -> Duration {
        self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_until_reports_lateness() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(5));
        let late = clock.sleep_until(start + Duration::from_millis(2));
        assert_eq!(late, Duration::from_millis(3));
    }

    #[test]
    fn sleep_until_waits_when_early() {
        let clock = ManualClock::new();
        let start = clock.now();
        let late = clock.sleep_until(start + Duration::from_millis(4));
        assert_eq!(late, Duration::ZERO);
        assert_eq!(clock.elapsed(), Duration::from_millis(4));
    }
}
