//! Awaitable retries.
//!
//! [`RetryFuture`] runs the same attempt loop as [`Retry::call`], but waits
//! between attempts on a [`Sleeper`] instead of blocking the thread. Dropping
//! the future cancels the sequence, including a delay in progress.

use std::{
    borrow::Cow,
    fmt::Display,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use futures_core::ready;
use pin_project::pin_project;

use crate::{
    args::Arguments,
    classify::Classify,
    exponential::ExponentialBackoff,
    report,
    retry::Retry,
    sink::Sink,
};

pub trait Sleeper {
    type Sleep: Future<Output = ()> + Send + 'static;
    fn sleep(&self, dur: Duration) -> Self::Sleep;
}

impl<K, S, W> Retry<K, S, W>
where
    K: PartialEq,
    S: Sink,
{
    /// Retries `operation(args.clone())` like [`Retry::call`], waiting between
    /// attempts on the runtime selected by the `tokio` or `async-std` feature.
    ///
    /// # Example
    ///
    /// ```rust
    /// # extern crate tokio;
    /// use retrying::Retry;
    /// use std::io::{Error, ErrorKind};
    ///
    /// async fn connect(addr: &'static str) -> Result<String, Error> {
    ///     Err(Error::new(ErrorKind::PermissionDenied, addr))
    /// }
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let mut retry = Retry::builder([ErrorKind::ConnectionRefused]).build().unwrap();
    /// let err = retry
    ///     .call_async(|(addr,)| connect(addr), ("10.0.0.1:5432",))
    ///     .await
    ///     .unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    /// # }
    /// ```
    #[cfg(any(feature = "tokio", feature = "async-std"))]
    #[cfg_attr(docsrs, doc(cfg(any(feature = "tokio", feature = "async-std"))))]
    pub fn call_async<A, T, E, F, Fut>(
        &mut self,
        operation: F,
        args: A,
    ) -> RetryFuture<'_, K, S, W, impl Sleeper, F, Fut, A>
    where
        A: Arguments + Clone,
        E: Classify<Kind = K> + Display,
        F: FnMut(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.call_async_with(rt_sleeper(), operation, args)
    }

    /// Like [`call_async`](Retry::call_async), waiting on the given `sleeper`.
    pub fn call_async_with<Sl, A, T, E, F, Fut>(
        &mut self,
        sleeper: Sl,
        operation: F,
        args: A,
    ) -> RetryFuture<'_, K, S, W, Sl, F, Fut, A>
    where
        Sl: Sleeper,
        A: Arguments + Clone,
        E: Classify<Kind = K> + Display,
        F: FnMut(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let name = self.name_for::<F>();
        let backoff = ExponentialBackoff::new(&self.config);
        RetryFuture {
            retry: self,
            sleeper,
            name,
            backoff,
            operation,
            args,
            delay: OptionPinned::None,
            fut: OptionPinned::None,
        }
    }
}

/// Retry implementation.
#[pin_project]
pub struct RetryFuture<'a, K, S, W, Sl: Sleeper, F, Fut, A> {
    /// Policy and sink of the sequence.
    retry: &'a mut Retry<K, S, W>,

    /// The [`Sleeper`] that we generate the `delay` futures from.
    sleeper: Sl,

    name: Cow<'static, str>,

    /// Attempt budget and next delay.
    backoff: ExponentialBackoff,

    /// Operation to be retried. It must return [`Future`].
    operation: F,

    /// Handed to every attempt by clone.
    args: A,

    /// [`Future`] which delays execution before the next attempt.
    #[pin]
    delay: OptionPinned<Sl::Sleep>,

    /// The attempt in flight, if any.
    #[pin]
    fut: OptionPinned<Fut>,
}

#[pin_project(project = OptionProj)]
enum OptionPinned<T> {
    Some(#[pin] T),
    None,
}

impl<'a, K, S, W, Sl, F, Fut, A, T, E> Future for RetryFuture<'a, K, S, W, Sl, F, Fut, A>
where
    K: PartialEq,
    S: Sink,
    Sl: Sleeper,
    A: Arguments + Clone,
    E: Classify<Kind = K> + Display,
    F: FnMut(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            if let OptionProj::Some(delay) = this.delay.as_mut().project() {
                ready!(delay.poll(cx));
                this.delay.set(OptionPinned::None);
            }

            let fut = match this.fut.as_mut().project() {
                OptionProj::Some(fut) => fut,
                OptionProj::None => {
                    report::attempt(
                        &mut this.retry.sink,
                        this.name,
                        this.backoff.attempt(),
                        this.retry.config.total_tries,
                    );
                    this.fut
                        .set(OptionPinned::Some((this.operation)(this.args.clone())));
                    continue;
                }
            };

            let result = ready!(fut.poll(cx));
            this.fut.set(OptionPinned::None);

            let err = match result {
                Ok(v) => return Poll::Ready(Ok(v)),
                Err(err) => err,
            };

            if !this.retry.retry_on.matches(&err.kind()) {
                return Poll::Ready(Err(err));
            }

            match this.backoff.next_backoff() {
                Some(duration) => {
                    report::retrying(&mut this.retry.sink, this.name, &err, duration, &*this.args);
                    tracing::trace!(
                        delay = ?duration,
                        attempt = this.backoff.attempt(),
                        "backing off"
                    );
                    this.delay
                        .set(OptionPinned::Some(this.sleeper.sleep(duration)));
                }
                None => {
                    report::gave_up(
                        &mut this.retry.sink,
                        this.name,
                        this.retry.config.total_tries,
                        &*this.args,
                    );
                    return Poll::Ready(Err(err));
                }
            }
        }
    }
}

#[cfg(all(feature = "tokio", feature = "async-std"))]
compile_error!("Feature \"tokio\" and \"async-std\" cannot be enabled at the same time");

#[cfg(feature = "async-std")]
fn rt_sleeper() -> impl Sleeper {
    AsyncStdSleeper
}

#[cfg(feature = "tokio")]
fn rt_sleeper() -> impl Sleeper {
    TokioSleeper
}

#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
impl Sleeper for TokioSleeper {
    type Sleep = ::tokio::time::Sleep;
    fn sleep(&self, dur: Duration) -> Self::Sleep {
        ::tokio::time::sleep(dur)
    }
}

#[cfg(feature = "async-std")]
#[cfg_attr(docsrs, doc(cfg(feature = "async-std")))]
#[derive(Debug, Default, Clone, Copy)]
pub struct AsyncStdSleeper;

#[cfg(feature = "async-std")]
#[cfg_attr(docsrs, doc(cfg(feature = "async-std")))]
impl Sleeper for AsyncStdSleeper {
    type Sleep = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
    fn sleep(&self, dur: Duration) -> Self::Sleep {
        Box::pin(::async_std::task::sleep(dur))
    }
}
