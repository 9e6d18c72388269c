use std::time::Duration;

use crate::config::RetryConfig;

/// Per-invocation retry state: the remaining attempt budget and the delay to
/// hand out next.
///
/// A fresh `ExponentialBackoff` is created for every call of the wrapped
/// operation and dropped when that call returns.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoff {
    /// The budget this state was created with.
    pub total_tries: u32,
    /// Attempts left, including the one currently running.
    pub attempts_remaining: u32,
    /// Delay in seconds to hand out on the next failure.
    pub current_delay: f64,
    /// Multiplier applied to `current_delay` each time a delay is handed out.
    pub backoff_factor: f64,
}

impl ExponentialBackoff {
    pub fn new(config: &RetryConfig) -> ExponentialBackoff {
        ExponentialBackoff {
            total_tries: config.total_tries,
            attempts_remaining: config.total_tries,
            current_delay: config.initial_wait,
            backoff_factor: config.backoff_factor,
        }
    }

    /// 1-based number of the attempt currently running.
    pub fn attempt(&self) -> u32 {
        self.total_tries
            .saturating_sub(self.attempts_remaining)
            .saturating_add(1)
    }

    /// Records a failed attempt.
    ///
    /// Returns the delay to wait before the next attempt, or `None` once the
    /// budget is spent and the failure has to go back to the caller.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        if self.attempts_remaining == 0 {
            return None;
        }

        let delay = secs_to_duration(self.current_delay);
        self.current_delay *= self.backoff_factor;
        Some(delay)
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
