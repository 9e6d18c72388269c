use retrying::{ConfigError, Failure, Level, Retry, RetryConfig, Tracing};

use std::cell::RefCell;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    Connection,
    Timeout,
    Fatal,
}

fn connection_error(detail: &str) -> Failure<Kind> {
    Failure::new(Kind::Connection, detail)
}

#[test]
fn retry() {
    let mut i = 0;
    let success_on = 3;
    let mut delays = Vec::new();

    {
        let mut retry = Retry::builder([Kind::Connection])
            .total_tries(3)
            .initial_wait(1.0)
            .backoff_factor(2.0)
            .sink(|_: Level, _: &str| {})
            .sleeper(|dur: Duration| delays.push(dur))
            .build()
            .unwrap();

        let result = retry.run(|| {
            i += 1;
            if i == success_on {
                return Ok("ok");
            }

            Err(connection_error("connection reset"))
        });
        assert_eq!(result, Ok("ok"));
    }

    assert_eq!(i, success_on);
    assert_eq!(delays, vec![Duration::from_secs(1), Duration::from_secs(2)]);
}

#[test]
fn always_failing_operation_is_called_total_tries_times() {
    for total_tries in 1..=5 {
        let mut calls = 0;
        let mut sleeps = 0;
        let mut retry = Retry::builder([Kind::Connection])
            .total_tries(total_tries)
            .sink(|_: Level, _: &str| {})
            .sleeper(|_: Duration| sleeps += 1)
            .build()
            .unwrap();

        let err = retry
            .run(|| -> Result<(), _> {
                calls += 1;
                Err(connection_error("refused"))
            })
            .unwrap_err();
        drop(retry);

        assert_eq!(err, connection_error("refused"));
        assert_eq!(calls, total_tries);
        assert_eq!(sleeps, total_tries - 1);
    }
}

#[test]
fn last_failure_is_returned_unchanged() {
    let mut attempt = 0;
    let mut retry = Retry::builder([Kind::Connection, Kind::Timeout])
        .total_tries(3)
        .sink(|_: Level, _: &str| {})
        .sleeper(|_: Duration| {})
        .build()
        .unwrap();

    let err = retry
        .run(|| -> Result<(), _> {
            attempt += 1;
            if attempt % 2 == 1 {
                Err(Failure::new(Kind::Connection, format!("attempt {}", attempt)))
            } else {
                Err(Failure::new(Kind::Timeout, format!("attempt {}", attempt)))
            }
        })
        .unwrap_err();

    assert_eq!(err, Failure::new(Kind::Connection, "attempt 3"));
}

#[test]
fn permanent_error_immediately_returned() {
    let mut calls = 0;
    let mut lines = Vec::new();
    let mut retry = Retry::builder([Kind::Connection])
        .total_tries(10)
        .sink(|_: Level, message: &str| lines.push(message.to_owned()))
        .sleeper(|_: Duration| panic!("must not sleep"))
        .build()
        .unwrap();

    let err = retry
        .run(|| -> Result<(), _> {
            calls += 1;
            Err(Failure::new(Kind::Fatal, "disk full"))
        })
        .unwrap_err();
    drop(retry);

    assert_eq!(err.kind, Kind::Fatal);
    assert_eq!(calls, 1);
    // Only the attempt announcement, no retry or give-up message.
    assert_eq!(lines.len(), 1);
}

#[test]
fn single_try_never_sleeps() {
    let mut calls = 0;
    let mut levels = Vec::new();
    let mut retry = Retry::builder([Kind::Connection])
        .total_tries(1)
        .sink(|level: Level, _: &str| levels.push(level))
        .sleeper(|_: Duration| panic!("must not sleep"))
        .build()
        .unwrap();

    let err = retry
        .run(|| -> Result<(), _> {
            calls += 1;
            Err(connection_error("refused"))
        })
        .unwrap_err();
    drop(retry);

    assert_eq!(err, connection_error("refused"));
    assert_eq!(calls, 1);
    assert_eq!(levels, vec![Level::INFO, Level::ERROR]);
}

#[test]
fn success_returns_without_delay() {
    let mut retry = Retry::builder([Kind::Connection])
        .sink(|_: Level, _: &str| {})
        .sleeper(|_: Duration| panic!("must not sleep"))
        .build()
        .unwrap();

    let value = retry.run(|| Ok::<_, Failure<Kind>>(42));
    assert_eq!(value, Ok(42));
}

#[test]
fn constant_and_shrinking_delays() {
    let mut constant = Vec::new();
    let mut shrinking = Vec::new();

    for (factor, delays) in vec![(1.0, &mut constant), (0.5, &mut shrinking)] {
        let mut retry = Retry::builder([Kind::Timeout])
            .total_tries(4)
            .initial_wait(4.0)
            .backoff_factor(factor)
            .sink(|_: Level, _: &str| {})
            .sleeper(|dur: Duration| delays.push(dur))
            .build()
            .unwrap();
        let _ = retry.run(|| -> Result<(), _> { Err(Failure::new(Kind::Timeout, "slow")) });
    }

    assert_eq!(constant, vec![Duration::from_secs(4); 3]);
    assert_eq!(
        shrinking,
        vec![
            Duration::from_secs(4),
            Duration::from_secs(2),
            Duration::from_secs(1)
        ]
    );
}

#[test]
fn arguments_are_identical_on_every_attempt() {
    let seen = RefCell::new(Vec::new());
    let mut retry = Retry::builder([Kind::Connection])
        .total_tries(4)
        .sink(|_: Level, _: &str| {})
        .sleeper(|_: Duration| {})
        .build()
        .unwrap();

    let result = retry.call(
        |args: &(String, u16)| {
            seen.borrow_mut().push(args.clone());
            if seen.borrow().len() < 4 {
                Err(connection_error("refused"))
            } else {
                Ok(args.1)
            }
        },
        ("db.internal".to_owned(), 5432),
    );

    assert_eq!(result, Ok(5432));
    let seen = seen.into_inner();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|args| *args == ("db.internal".to_owned(), 5432)));
}

#[test]
fn messages_name_operation_error_delay_and_arguments() {
    let mut lines = Vec::new();
    let mut retry = Retry::builder([Kind::Connection])
        .total_tries(2)
        .initial_wait(1.5)
        .name("fetch")
        .sink(|level: Level, message: &str| lines.push((level, message.to_owned())))
        .sleeper(|_: Duration| {})
        .build()
        .unwrap();

    let _ = retry.call(
        |_: &(&str, i32)| -> Result<(), _> { Err(connection_error("connection reset")) },
        ("https://example.com", 3),
    );
    drop(retry);

    assert_eq!(
        lines,
        vec![
            (Level::INFO, "fetch: attempt 1 of 2".to_owned()),
            (
                Level::WARN,
                r#"fetch failed: connection reset; retrying in 1.5 s (args: ("https://example.com", 3))"#
                    .to_owned()
            ),
            (Level::INFO, "fetch: attempt 2 of 2".to_owned()),
            (
                Level::ERROR,
                r#"fetch gave up after 2 tries (args: ("https://example.com", 3))"#.to_owned()
            ),
        ]
    );
}

#[test]
fn missing_arguments_are_spelled_out() {
    let mut lines = Vec::new();
    let mut retry = Retry::builder([Kind::Connection])
        .total_tries(1)
        .name("ping")
        .sink(|_: Level, message: &str| lines.push(message.to_owned()))
        .build()
        .unwrap();

    let _ = retry.run(|| -> Result<(), _> { Err(connection_error("refused")) });
    drop(retry);

    assert_eq!(
        lines.last().map(String::as_str),
        Some("ping gave up after 1 tries (args: no positional arguments)")
    );
}

fn flaky_connect(addr: &(&'static str,)) -> io::Result<&'static str> {
    Err(io::Error::new(io::ErrorKind::ConnectionRefused, addr.0))
}

#[test]
fn default_name_is_the_operation_type_name() {
    let mut lines = Vec::new();
    let mut retry = Retry::builder([io::ErrorKind::ConnectionRefused])
        .total_tries(1)
        .sink(|_: Level, message: &str| lines.push(message.to_owned()))
        .build()
        .unwrap();

    let err = retry.call(flaky_connect, ("10.0.0.7:6379",)).unwrap_err();
    drop(retry);

    assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
    assert!(lines[0].contains("flaky_connect"), "{}", lines[0]);
}

#[test]
fn wrapped_operation_can_be_called_repeatedly() {
    let mut calls = 0;
    let retry = Retry::builder([io::ErrorKind::Interrupted])
        .total_tries(2)
        .sink(|_: Level, _: &str| {})
        .sleeper(|_: Duration| {})
        .build()
        .unwrap();

    let mut double = retry.wrap(|n: &(u32,)| {
        calls += 1;
        if calls % 2 == 1 {
            Err(io::Error::from(io::ErrorKind::Interrupted))
        } else {
            Ok(n.0 * 2)
        }
    });

    assert_eq!(double.call((2,)).unwrap(), 4);
    assert_eq!(double.call((5,)).unwrap(), 10);
    let (retry, _) = double.into_inner();
    assert_eq!(retry.config().total_tries, 2);
    assert_eq!(retry.retry_on().kinds(), &[io::ErrorKind::Interrupted]);
    assert_eq!(calls, 4);
}

#[test]
fn invalid_configuration_is_rejected() {
    let err = Retry::builder([Kind::Connection])
        .total_tries(0)
        .build()
        .unwrap_err();
    assert_eq!(err, ConfigError::ZeroTries);

    let err = Retry::builder([Kind::Connection])
        .config(RetryConfig {
            initial_wait: -0.5,
            ..RetryConfig::default()
        })
        .build()
        .unwrap_err();
    assert_eq!(err, ConfigError::InvalidInitialWait(-0.5));

    let err = Retry::builder([Kind::Connection])
        .backoff_factor(-2.0)
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "backoff_factor must be finite and non-negative (got -2)"
    );
}

type Events = Arc<Mutex<Vec<(Level, String, String)>>>;

/// Keeps level, target and message of every event.
struct CaptureLayer(Events);

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        let metadata = event.metadata();
        self.0.lock().unwrap().push((
            *metadata.level(),
            metadata.target().to_owned(),
            visitor.0,
        ));
    }
}

#[test]
fn tracing_sink_emits_leveled_events() {
    let events = Events::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(events.clone()));

    tracing::subscriber::with_default(subscriber, || {
        let mut retry = Retry::builder([Kind::Connection])
            .total_tries(2)
            .initial_wait(0.25)
            .name("fetch")
            .sink(Tracing)
            .sleeper(|_: Duration| {})
            .build()
            .unwrap();

        let _ = retry.call(
            |_: &(&str,)| -> Result<(), _> { Err(connection_error("connection reset")) },
            ("db",),
        );
    });

    let events = events.lock().unwrap();
    let messages = events
        .iter()
        .filter(|(_, target, _)| target == "retrying")
        .cloned()
        .collect::<Vec<_>>();
    let target = "retrying".to_owned();
    assert_eq!(
        messages,
        vec![
            (Level::INFO, target.clone(), "fetch: attempt 1 of 2".to_owned()),
            (
                Level::WARN,
                target.clone(),
                r#"fetch failed: connection reset; retrying in 0.25 s (args: ("db",))"#.to_owned()
            ),
            (Level::INFO, target.clone(), "fetch: attempt 2 of 2".to_owned()),
            (
                Level::ERROR,
                target,
                r#"fetch gave up after 2 tries (args: ("db",))"#.to_owned()
            ),
        ]
    );

    // The sync loop also leaves a trace event before it sleeps.
    assert!(events
        .iter()
        .any(|(level, _, message)| *level == Level::TRACE && message == "backing off"));
}
