//! Clock abstraction for determinism.

use std::time::Instant;

/// Abstraction over a monotonic time source.
///
/// Playback derives elapsed time from two readings of this clock, so
/// implementations must never go backwards.
pub trait Clock: Send + Sync {
    /// Returns the current monotonic reading.
    fn now(&self) -> Instant;
}

/// Production clock that delegates to the operating system's monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
