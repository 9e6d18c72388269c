//! Destinations for progress and failure messages.

pub use tracing::Level;

/// Sink records the human-readable messages of a retry sequence or a timed
/// call.
///
/// Closures of the form `FnMut(Level, &str)` are sinks:
///
/// ```rust
/// use retrying::{Level, Sink};
///
/// let mut lines = Vec::new();
/// let mut sink = |_: Level, message: &str| lines.push(message.to_owned());
/// sink.record(Level::WARN, "retrying");
/// assert_eq!(lines, ["retrying"]);
/// ```
pub trait Sink {
    fn record(&mut self, level: Level, message: &str);
}

impl<F> Sink for F
where
    F: FnMut(Level, &str),
{
    fn record(&mut self, level: Level, message: &str) {
        self(level, message)
    }
}

/// Writes every message as one line to standard output. Used when no other
/// sink is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl Sink for Console {
    fn record(&mut self, _level: Level, message: &str) {
        println!("{}", message);
    }
}

/// Forwards messages to `tracing` as events under the `retrying` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tracing;

impl Sink for Tracing {
    fn record(&mut self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "retrying", "{}", message),
            Level::WARN => tracing::warn!(target: "retrying", "{}", message),
            Level::INFO => tracing::info!(target: "retrying", "{}", message),
            Level::DEBUG => tracing::debug!(target: "retrying", "{}", message),
            _ => tracing::trace!(target: "retrying", "{}", message),
        }
    }
}
