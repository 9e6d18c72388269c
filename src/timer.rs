//! Wall-clock timing of a wrapped operation.

use std::any;
use std::borrow::Cow;

use crate::clock::{Clock, SystemClock};
use crate::sink::{Console, Level, Sink};

/// Wraps `operation` so that every call reports how long it took.
///
/// ```rust
/// let mut square = retrying::timed(|x: u64| x * x).named("square");
/// assert_eq!(square.call(12), 144); // prints "square ran in … s"
/// ```
pub fn timed<F>(operation: F) -> Timed<F> {
    Timed {
        operation,
        name: None,
        sink: Console,
        clock: SystemClock,
    }
}

/// An operation whose calls are timed. Created by [`timed`].
#[derive(Debug, Clone)]
pub struct Timed<F, S = Console, C = SystemClock> {
    operation: F,
    name: Option<Cow<'static, str>>,
    sink: S,
    clock: C,
}

impl<F, S, C> Timed<F, S, C> {
    /// Name used in the report. Defaults to the operation's type name.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sink<S2: Sink>(self, sink: S2) -> Timed<F, S2, C> {
        Timed {
            operation: self.operation,
            name: self.name,
            sink,
            clock: self.clock,
        }
    }

    pub fn clock<C2: Clock>(self, clock: C2) -> Timed<F, S, C2> {
        Timed {
            operation: self.operation,
            name: self.name,
            sink: self.sink,
            clock,
        }
    }

    pub fn into_inner(self) -> F {
        self.operation
    }
}

impl<F, S, C> Timed<F, S, C>
where
    S: Sink,
    C: Clock,
{
    /// Calls the operation and records `"{name} ran in {seconds} s"`.
    /// The result is returned untouched.
    pub fn call<A, T>(&mut self, args: A) -> T
    where
        F: FnMut(A) -> T,
    {
        let start = self.clock.now();
        let result = (self.operation)(args);
        let elapsed = self.clock.now().duration_since(start);

        let name = self.name.as_deref().unwrap_or(any::type_name::<F>());
        let message = format!("{} ran in {} s", name, elapsed.as_secs_f64());
        self.sink.record(Level::INFO, &message);
        result
    }
}
