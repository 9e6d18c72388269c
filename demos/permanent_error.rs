use retrying::{Failure, Retry};

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    Unavailable,
    BadInput,
}

fn parse_port(raw: &str) -> Result<u16, Failure<Kind>> {
    // Non-retryable failures are handed back after the first attempt.
    raw.parse()
        .map_err(|err| Failure::new(Kind::BadInput, format!("{:?}: {}", raw, err)))
}

fn main() {
    let mut retry = Retry::builder([Kind::Unavailable])
        .build()
        .expect("default configuration is valid");

    match retry.call(|(raw,)| parse_port(raw), ("http",)) {
        Ok(port) => println!("Port {}", port),
        Err(err) => println!("Gave up: {} ({:?})", err, err.kind),
    }
}
