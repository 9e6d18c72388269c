use std::any;
use std::borrow::Cow;
use std::fmt::Display;

use crate::args::Arguments;
use crate::classify::{Classify, RetryOn};
use crate::config::RetryConfig;
use crate::error::ConfigError;
use crate::exponential::ExponentialBackoff;
use crate::report;
use crate::sink::{Console, Sink};
use crate::sleep::{Sleep, ThreadSleep};

/// Re-invokes an operation on retryable failures, waiting an exponentially
/// growing delay in between, until it succeeds or the attempt budget runs out.
///
/// Every attempt is announced on the [`Sink`]. A retryable failure is either
/// followed by a warning and a delay, or, on the last attempt, by a final
/// error message and handed back to the caller as is. Failures whose kind is
/// not in the [`RetryOn`] set are returned immediately and silently.
///
/// # Example
///
/// ```rust
/// use retrying::Retry;
/// use std::io::{Error, ErrorKind};
///
/// let mut retry = Retry::builder([ErrorKind::ConnectionRefused])
///     .total_tries(3)
///     .initial_wait(0.0)
///     .build()
///     .unwrap();
///
/// let mut calls = 0;
/// let result = retry.run(|| {
///     calls += 1;
///     if calls < 3 {
///         Err(Error::new(ErrorKind::ConnectionRefused, "refused"))
///     } else {
///         Ok("ok")
///     }
/// });
/// assert_eq!(result.unwrap(), "ok");
/// assert_eq!(calls, 3);
/// ```
#[derive(Debug, Clone)]
pub struct Retry<K, S = Console, W = ThreadSleep> {
    pub(crate) retry_on: RetryOn<K>,
    pub(crate) config: RetryConfig,
    pub(crate) sink: S,
    pub(crate) sleeper: W,
    pub(crate) name: Option<Cow<'static, str>>,
}

impl<K: PartialEq> Retry<K> {
    /// Starts configuring a `Retry` that retries on the given failure kinds.
    pub fn builder(retry_on: impl Into<RetryOn<K>>) -> RetryBuilder<K> {
        RetryBuilder {
            retry_on: retry_on.into(),
            config: RetryConfig::default(),
            sink: Console,
            sleeper: ThreadSleep,
            name: None,
        }
    }
}

impl<K, S, W> Retry<K, S, W> {
    /// Attempt budget and delay policy.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Failure kinds that trigger another attempt.
    pub fn retry_on(&self) -> &RetryOn<K> {
        &self.retry_on
    }

    pub(crate) fn name_for<F>(&self) -> Cow<'static, str> {
        self.name
            .clone()
            .unwrap_or(Cow::Borrowed(any::type_name::<F>()))
    }
}

impl<K, S, W> Retry<K, S, W>
where
    K: PartialEq,
    S: Sink,
    W: Sleep,
{
    /// Calls `operation(&args)` until it succeeds, fails with a kind that is
    /// not retried, or `total_tries` attempts have failed.
    ///
    /// All attempts see the same `args`. The returned error is the one the
    /// operation produced on its last attempt.
    pub fn call<A, T, E, F>(&mut self, mut operation: F, args: A) -> Result<T, E>
    where
        A: Arguments,
        E: Classify<Kind = K> + Display,
        F: FnMut(&A) -> Result<T, E>,
    {
        let name = self.name_for::<F>();
        self.invoke(&name, &mut operation, &args)
    }

    /// Like [`call`](Retry::call) for operations that take no arguments.
    pub fn run<T, E, F>(&mut self, mut operation: F) -> Result<T, E>
    where
        E: Classify<Kind = K> + Display,
        F: FnMut() -> Result<T, E>,
    {
        let name = self.name_for::<F>();
        self.invoke(&name, &mut |_: &()| operation(), &())
    }

    /// Binds `operation` to this policy, so that it can be called repeatedly
    /// like the plain function it wraps.
    pub fn wrap<F>(self, operation: F) -> Retrying<K, S, W, F> {
        Retrying {
            retry: self,
            operation,
        }
    }

    fn invoke<A, T, E, F>(&mut self, name: &str, operation: &mut F, args: &A) -> Result<T, E>
    where
        A: Arguments,
        E: Classify<Kind = K> + Display,
        F: FnMut(&A) -> Result<T, E>,
    {
        let mut backoff = ExponentialBackoff::new(&self.config);

        loop {
            report::attempt(
                &mut self.sink,
                name,
                backoff.attempt(),
                self.config.total_tries,
            );

            let err = match operation(args) {
                Ok(v) => return Ok(v),
                Err(err) => err,
            };

            if !self.retry_on.matches(&err.kind()) {
                return Err(err);
            }

            let next = match backoff.next_backoff() {
                Some(next) => next,
                None => {
                    report::gave_up(&mut self.sink, name, self.config.total_tries, args);
                    return Err(err);
                }
            };

            report::retrying(&mut self.sink, name, &err, next, args);
            tracing::trace!(delay = ?next, attempt = backoff.attempt(), "backing off");
            self.sleeper.sleep(next);
        }
    }
}

/// Configures a [`Retry`]. Obtained from [`Retry::builder`].
#[derive(Debug, Clone)]
pub struct RetryBuilder<K, S = Console, W = ThreadSleep> {
    retry_on: RetryOn<K>,
    config: RetryConfig,
    sink: S,
    sleeper: W,
    name: Option<Cow<'static, str>>,
}

impl<K, S, W> RetryBuilder<K, S, W> {
    pub fn total_tries(mut self, total_tries: u32) -> Self {
        self.config.total_tries = total_tries;
        self
    }

    /// Delay in seconds before the second attempt.
    pub fn initial_wait(mut self, secs: f64) -> Self {
        self.config.initial_wait = secs;
        self
    }

    pub fn backoff_factor(mut self, factor: f64) -> Self {
        self.config.backoff_factor = factor;
        self
    }

    /// Replaces all three numeric settings at once.
    pub fn config(mut self, config: RetryConfig) -> Self {
        self.config = config;
        self
    }

    /// Name used for the operation in messages. Defaults to the operation's
    /// type name.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sink<S2: Sink>(self, sink: S2) -> RetryBuilder<K, S2, W> {
        RetryBuilder {
            retry_on: self.retry_on,
            config: self.config,
            sink,
            sleeper: self.sleeper,
            name: self.name,
        }
    }

    pub fn sleeper<W2: Sleep>(self, sleeper: W2) -> RetryBuilder<K, S, W2> {
        RetryBuilder {
            retry_on: self.retry_on,
            config: self.config,
            sink: self.sink,
            sleeper,
            name: self.name,
        }
    }

    pub fn build(self) -> Result<Retry<K, S, W>, ConfigError> {
        self.config.validate()?;
        Ok(Retry {
            retry_on: self.retry_on,
            config: self.config,
            sink: self.sink,
            sleeper: self.sleeper,
            name: self.name,
        })
    }
}

/// An operation bound to a [`Retry`] policy. Created by [`Retry::wrap`].
#[derive(Debug, Clone)]
pub struct Retrying<K, S, W, F> {
    retry: Retry<K, S, W>,
    operation: F,
}

impl<K, S, W, F> Retrying<K, S, W, F>
where
    K: PartialEq,
    S: Sink,
    W: Sleep,
{
    /// Runs the wrapped operation with `args` under the retry policy.
    pub fn call<A, T, E>(&mut self, args: A) -> Result<T, E>
    where
        A: Arguments,
        E: Classify<Kind = K> + Display,
        F: FnMut(&A) -> Result<T, E>,
    {
        let name = self.retry.name_for::<F>();
        self.retry.invoke(&name, &mut self.operation, &args)
    }

    pub fn into_inner(self) -> (Retry<K, S, W>, F) {
        (self.retry, self.operation)
    }
}
