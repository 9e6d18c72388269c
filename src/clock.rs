use instant::Instant;

/// Source of the instants [`Timed`](crate::Timed) measures between.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Reads the monotonic system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
