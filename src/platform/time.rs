//! Clocks
//!
//! The loop reads time through `Clock` so tests and headless runs can use a
//! manual clock that only advances when asked to sleep.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub trait Clock {
    /// Monotonic milliseconds since the clock was created
    fn now_ms(&self) -> u64;
    /// Block (or pretend to) for `duration`
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Simulated clock: time only moves on `sleep` or `advance`
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: start_ms }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration.as_millis() as u64);
    }
}

/// Current Unix time in seconds (0 if the system clock is before the epoch)
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances_on_sleep() {
        let mut clock = ManualClock::new(500);
        assert_eq!(clock.now_ms(), 500);
        clock.sleep(Duration::from_millis(100));
        clock.advance(25);
        assert_eq!(clock.now_ms(), 625);
    }

    #[test]
    fn test_system_clock_never_goes_back() {
        let mut clock = SystemClock::new();
        let mut last = clock.now_ms();
        for _ in 0..5 {
            clock.sleep(Duration::from_millis(2));
            let now = clock.now_ms();
            assert!(now >= last + 2, "{} after {}", now, last);
            last = now;
        }
    }

    #[test]
    fn test_unix_now_is_recent() {
        // 2020-01-01
        assert!(unix_now() > 1_577_836_800);
    }
}
