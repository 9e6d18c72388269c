use std::fmt::Display;
use std::time::Duration;

use crate::args::{Arguments, Shown};
use crate::sink::{Level, Sink};

pub(crate) fn attempt<S: Sink>(sink: &mut S, name: &str, attempt: u32, total_tries: u32) {
    let message = format!("{}: attempt {} of {}", name, attempt, total_tries);
    sink.record(Level::INFO, &message);
}

pub(crate) fn retrying<S, E, A>(sink: &mut S, name: &str, err: &E, delay: Duration, args: &A)
where
    S: Sink,
    E: Display,
    A: Arguments + ?Sized,
{
    let message = format!(
        "{} failed: {}; retrying in {} s (args: {})",
        name,
        err,
        delay.as_secs_f64(),
        Shown(args)
    );
    sink.record(Level::WARN, &message);
}

pub(crate) fn gave_up<S, A>(sink: &mut S, name: &str, total_tries: u32, args: &A)
where
    S: Sink,
    A: Arguments + ?Sized,
{
    let message = format!(
        "{} gave up after {} tries (args: {})",
        name,
        total_tries,
        Shown(args)
    );
    sink.record(Level::ERROR, &message);
}
