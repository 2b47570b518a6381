//! Randomized delay source abstraction.

use std::time::Duration;

use rand::Rng;

/// Source of the random delay offsets RFC 3927 uses to desynchronize hosts.
///
/// Injected rather than drawn from a process-wide generator so tests can
/// substitute a fixed value and assert on exact sleep schedules.
pub trait JitterSource: Send {
    /// Returns a uniformly distributed duration in `[0, bound)`.
    fn sample(&mut self, bound: Duration) -> Duration;
}

/// Jitter drawn from the thread-local random number generator.
#[derive(Debug, Default)]
pub struct ThreadJitter;

impl JitterSource for ThreadJitter {
    fn sample(&mut self, bound: Duration) -> Duration {
        let bound_ms = bound.as_millis() as u64;
        if bound_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..bound_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stays_below_bound() {
        let mut jitter = ThreadJitter;
        let bound = Duration::from_millis(1000);
        for _ in 0..200 {
            assert!(jitter.sample(bound) < bound);
        }
    }

    #[test]
    fn test_zero_bound_yields_zero() {
        let mut jitter = ThreadJitter;
        assert_eq!(jitter.sample(Duration::ZERO), Duration::ZERO);
    }
}
