use thiserror::Error;

/// Rejected retry configuration.
///
/// This is the only error the crate produces itself. Failures of the wrapped
/// operation are always handed back to the caller untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("total_tries must be at least 1")]
    ZeroTries,
    #[error("initial_wait must be a finite, non-negative number of seconds (got {0})")]
    InvalidInitialWait(f64),
    #[error("backoff_factor must be finite and non-negative (got {0})")]
    InvalidBackoffFactor(f64),
}
