use std::{
    thread,
    time::{Duration, Instant},
};

/// Source of time and bounded waits.
///
/// Autoconfiguration waits in bounded increments (probe waits, inter-probe
/// gaps, the announcement gap); routing those waits through this trait lets
/// tests substitute a manual clock and run with no real elapsed time.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current time instant.
    fn now(&self) -> Instant;

    /// Blocks the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// System clock using `Instant::now()` and `thread::sleep`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
