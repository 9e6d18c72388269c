//! Constants for the default retry policy.

/// The default attempt budget (4 tries, so 3 retries).
pub const TOTAL_TRIES: u32 = 4;
/// The default delay in seconds before the second attempt.
pub const INITIAL_WAIT_SECS: f64 = 3.0;
/// The default multiplier (2.0 doubles the delay after every failed attempt).
pub const BACKOFF_FACTOR: f64 = 2.0;
