use retrying::{timed, Clock, Level};

use instant::Instant;
use std::cell::RefCell;
use std::time::Duration;

struct Inner {
    i: Duration,
    start: Instant,
}

/// Advances one second on every reading.
struct TestClock(RefCell<Inner>);

impl TestClock {
    fn new(i: Duration, start: Instant) -> TestClock {
        TestClock(RefCell::new(Inner { i, start }))
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        let mut inner = self.0.borrow_mut();
        let t = inner.start + inner.i;
        inner.i += Duration::from_secs(1);
        t
    }
}

#[test]
fn reports_elapsed_seconds() {
    let mut lines = Vec::new();
    {
        let mut tick = timed(|n: u32| n + 1)
            .named("tick")
            .clock(TestClock::new(Duration::ZERO, Instant::now()))
            .sink(|level: Level, message: &str| lines.push((level, message.to_owned())));

        assert_eq!(tick.call(1), 2);
        assert_eq!(tick.call(2), 3);
    }

    assert_eq!(
        lines,
        vec![
            (Level::INFO, "tick ran in 1 s".to_owned()),
            (Level::INFO, "tick ran in 1 s".to_owned()),
        ]
    );
}

#[test]
fn result_is_passed_through_untouched() {
    let mut timed_parse = timed(|s: &str| s.parse::<i32>()).sink(|_: Level, _: &str| {});

    assert_eq!(timed_parse.call("17"), Ok(17));
    assert!(timed_parse.call("seventeen").is_err());
}

fn checksum(bytes: &[u8]) -> u32 {
    bytes.iter().map(|&b| u32::from(b)).sum()
}

#[test]
fn default_name_is_the_operation_type_name() {
    let mut lines = Vec::new();
    let mut timed_checksum = timed(checksum).sink(|_: Level, message: &str| {
        lines.push(message.to_owned())
    });

    assert_eq!(timed_checksum.call(&[1, 2, 3][..]), 6);
    drop(timed_checksum);

    assert!(lines[0].contains("checksum ran in "), "{}", lines[0]);
}
