use std::thread;
use std::time::Duration;

/// Blocks the caller between two attempts.
///
/// Any `FnMut(Duration)` closure is a `Sleep`, which makes it easy to observe
/// the delay sequence without actually waiting.
pub trait Sleep {
    fn sleep(&mut self, dur: Duration);
}

impl<F> Sleep for F
where
    F: FnMut(Duration),
{
    fn sleep(&mut self, dur: Duration) {
        self(dur)
    }
}

/// `ThreadSleep` parks the calling thread for the whole delay.
/// This is what should be used for real use-cases.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&mut self, dur: Duration) {
        thread::sleep(dur)
    }
}
