/// Monotonic millisecond counter. Expected to wrap at `u32::MAX`.
pub trait MonotonicClock {
    fn now_ms(&self) -> u32;
}

/// Fixed-interval, non-blocking gate for sensor sampling.
///
/// Elapsed time is computed with modular `u32` subtraction, so the timer keeps
/// firing correctly when the millisecond counter wraps (every ~49.7 days).
/// A late poll fires once and re-arms at `now`; missed intervals are not made up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingTimer {
    last_fired: u32,
    interval_ms: u32,
}

impl SamplingTimer {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            last_fired: 0,
            interval_ms,
        }
    }

    /// Restart the interval from `now` without firing.
    pub fn arm(&mut self, now: u32) {
        self.last_fired = now;
    }

    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub const fn last_fired(&self) -> u32 {
        self.last_fired
    }

    pub const fn elapsed(&self, now: u32) -> u32 {
        now.wrapping_sub(self.last_fired)
    }

    pub const fn is_due(&self, now: u32) -> bool {
        self.elapsed(now) >= self.interval_ms
    }

    /// Fire if due, resetting the reference point to `now`.
    pub fn poll(&mut self, now: u32) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last_fired = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_exactly_at_interval() {
        let mut timer = SamplingTimer::new(60_000);
        assert!(!timer.poll(59_999));
        assert!(timer.poll(60_000));
        assert_eq!(timer.last_fired(), 60_000);
        assert!(!timer.poll(60_001));
        assert!(timer.poll(120_000));
    }

    #[test]
    fn test_fires_across_counter_wrap() {
        let mut timer = SamplingTimer::new(10_000);
        timer.arm(u32::MAX - 4_000);

        // 4_001 ms up to the wrap plus 4_999 after it
        assert!(!timer.poll(4_999));
        assert!(timer.poll(5_999));
        assert_eq!(timer.last_fired(), 5_999);
        assert!(!timer.poll(6_000));
    }

    #[test]
    fn test_late_poll_does_not_catch_up() {
        let mut timer = SamplingTimer::new(1_000);
        timer.arm(0);

        // Three intervals elapsed during a stall: one fire, then re-armed at now
        assert!(timer.poll(3_500));
        assert_eq!(timer.last_fired(), 3_500);
        assert!(!timer.poll(4_000));
        assert!(timer.poll(4_500));
    }
}
