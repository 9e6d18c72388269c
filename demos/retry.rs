use retrying::{Retry, Tracing};

use std::io::{self, ErrorKind};
use std::net::TcpStream;

fn connect(addr: &str) -> io::Result<TcpStream> {
    let mut retry = Retry::builder([ErrorKind::ConnectionRefused, ErrorKind::TimedOut])
        .total_tries(4)
        .initial_wait(0.2)
        .backoff_factor(2.0)
        .name("connect")
        .sink(Tracing)
        .build()
        .map_err(|err| io::Error::new(ErrorKind::InvalidInput, err))?;

    retry.call(|(addr,)| TcpStream::connect(*addr), (addr,))
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:6379".to_owned());

    match connect(&addr) {
        Ok(stream) => println!("Connected to {:?}", stream.peer_addr()),
        Err(err) => println!("Failed to connect: {}", err),
    }
}
