use std::hint;
use std::thread;

/// Adaptive backoff strategy (Crossbeam-style).
///
/// Progressively increases wait time: spin with PAUSE → yield to OS → give up.
/// The spin-to-yield threshold is configurable so callers can derive a
/// concurrency-scaled spin-then-yield cadence from a single shared
/// implementation rather than a bespoke loop per call site.
#[derive(Debug)]
pub struct Backoff {
    step: u32,
    spin_limit: u32,
    yield_limit: u32,
}

impl Backoff {
    const DEFAULT_SPIN_LIMIT: u32 = 6; // 2^6 = 64 spins max before yielding
    const DEFAULT_YIELD_LIMIT: u32 = 10; // Then give up

    /// Creates a new backoff instance with the default spin/yield thresholds.
    #[inline]
    pub fn new() -> Self {
        Self {
            step: 0,
            spin_limit: Self::DEFAULT_SPIN_LIMIT,
            yield_limit: Self::DEFAULT_YIELD_LIMIT,
        }
    }

    /// Creates a backoff whose spin-to-yield threshold is derived from a
    /// `concurrency` value: the thread yields after roughly `concurrency`
    /// spin iterations rather than after a fixed doubling schedule.
    #[inline]
    pub fn with_concurrency(concurrency: u32) -> Self {
        let spin_limit = concurrency.max(1).ilog2();
        Self {
            step: 0,
            spin_limit,
            yield_limit: spin_limit + Self::DEFAULT_YIELD_LIMIT,
        }
    }

    /// Light spin with PAUSE hints.
    #[inline]
    pub fn spin(&mut self) {
        let spins = 1u32 << self.step.min(self.spin_limit);
        for _ in 0..spins {
            hint::spin_loop();
        }
        if self.step <= self.spin_limit {
            self.step += 1;
        }
    }

    /// Heavier backoff: spin then yield.
    #[inline]
    pub fn snooze(&mut self) {
        if self.step <= self.spin_limit {
            self.spin();
        } else {
            thread::yield_now();
            if self.step <= self.yield_limit {
                self.step += 1;
            }
        }
    }

    /// Check if we've exhausted patience.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.step > self.yield_limit
    }

    /// Reset for next wait cycle.
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_progression() {
        let mut b = Backoff::new();

        assert_eq!(b.step, 0);

        b.spin();
        assert!(b.step > 0);

        while !b.is_completed() {
            b.snooze();
        }
        assert!(b.step > b.yield_limit);

        b.reset();
        assert_eq!(b.step, 0);
    }

    #[test]
    fn test_backoff_with_concurrency() {
        let mut b = Backoff::with_concurrency(256);
        assert_eq!(b.spin_limit, 8); // log2(256)
        while !b.is_completed() {
            b.snooze();
        }
    }
}
