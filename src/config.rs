use crate::default;
use crate::error::ConfigError;

/// Attempt budget and delay policy of a [`Retry`](crate::Retry).
///
/// The delay before attempt `i + 1` is `initial_wait * backoff_factor^(i - 1)`
/// seconds. A factor of 1 keeps the delay constant, a factor below 1 shrinks it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub total_tries: u32,
    /// Delay in seconds before the second attempt.
    pub initial_wait: f64,
    /// Multiplier applied to the delay after each failed attempt.
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> RetryConfig {
        RetryConfig {
            total_tries: default::TOTAL_TRIES,
            initial_wait: default::INITIAL_WAIT_SECS,
            backoff_factor: default::BACKOFF_FACTOR,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_tries == 0 {
            return Err(ConfigError::ZeroTries);
        }
        if !self.initial_wait.is_finite() || self.initial_wait < 0.0 {
            return Err(ConfigError::InvalidInitialWait(self.initial_wait));
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 0.0 {
            return Err(ConfigError::InvalidBackoffFactor(self.backoff_factor));
        }
        Ok(())
    }
}
