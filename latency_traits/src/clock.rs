use std::thread;
use std::time::{Duration, Instant};

/// Monotonic clock abstraction for timestamping and timing across the stack.
///
/// - now(): returns a monotonic Instant
/// - sleep(): sleeps for the provided duration (implementations may simulate)
/// - ms_since(): helper to compute elapsed milliseconds from an epoch Instant
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);

    /// Milliseconds elapsed since `epoch`, saturating at 0 on underflow.
    fn ms_since(&self, epoch: Instant) -> u64 {
        let dur = self.now().saturating_duration_since(epoch);
        dur.as_millis() as u64
    }
}

/// Default, real-time monotonic clock backed by std::time::Instant.
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


#[cfg(test)]
mod tests {
    use super::test_clock::TestClock;
    use super::*;

    #[test]
    fn ms_since_tracks_simulated_sleep() {
        let clock = TestClock::new();
        let epoch = clock.now();
        clock.sleep(Duration::from_millis(25));
        assert_eq!(clock.ms_since(epoch), 25);
    }

    #[test]
    fn ms_since_saturates_for_future_epoch() {
        let clock = MonotonicClock::new();
        let epoch = clock.now() + Duration::from_secs(60);
        assert_eq!(clock.ms_since(epoch), 0);
    }
}
