#![cfg_attr(docsrs, feature(doc_cfg))]

//! `retrying` re-invokes fallible operations with exponential backoff.
//!
//! A [`Retry`] is configured once with the failure kinds worth retrying
//! ([`RetryOn`]), an attempt budget and a delay policy ([`RetryConfig`]). It
//! then calls an operation until the operation succeeds, fails with a kind
//! that is not retried, or the budget is spent. In the last two cases the
//! operation's own error is handed back unchanged.
//!
//! Between attempts the calling thread sleeps `initial_wait`,
//! `initial_wait * backoff_factor`, `initial_wait * backoff_factor²`, ...
//! seconds. With one of the `tokio` or `async-std` features,
//! [`Retry::call_async`] waits on the runtime's timer instead.
//!
//! Every attempt, retry and give-up is described on a [`Sink`]. The default,
//! [`Console`], prints to standard output; [`Tracing`] forwards to `tracing`.
//!
//! ```rust
//! use retrying::{Retry, Tracing};
//! use std::io::{self, ErrorKind};
//! use std::net::TcpStream;
//!
//! fn connect() -> io::Result<TcpStream> {
//!     let mut retry = Retry::builder([ErrorKind::ConnectionRefused, ErrorKind::TimedOut])
//!         .total_tries(3)
//!         .initial_wait(0.01)
//!         .sink(Tracing)
//!         .build()
//!         .map_err(|err| io::Error::new(ErrorKind::InvalidInput, err))?;
//!
//!     retry.call(|(host, port)| TcpStream::connect((*host, *port)), ("127.0.0.1", 1u16))
//! }
//! # let _ = connect();
//! ```
//!
//! [`timed`] is a sibling wrapper that reports how long each call took.

mod args;
mod classify;
mod clock;
mod config;
pub mod default;
mod error;
mod exponential;
#[cfg(feature = "futures")]
#[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
pub mod future;
mod report;
mod retry;
mod sink;
mod sleep;
mod timer;

pub use args::Arguments;
pub use classify::{Classify, Failure, RetryOn};
pub use clock::{Clock, SystemClock};
pub use config::RetryConfig;
pub use error::ConfigError;
pub use exponential::ExponentialBackoff;
pub use retry::{Retry, RetryBuilder, Retrying};
pub use sink::{Console, Level, Sink, Tracing};
pub use sleep::{Sleep, ThreadSleep};
pub use timer::{timed, Timed};
