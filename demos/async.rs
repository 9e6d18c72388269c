use retrying::{Failure, Retry};

use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    Busy,
}

static CALLS: AtomicU32 = AtomicU32::new(0);

async fn reserve(seat: &'static str) -> Result<String, Failure<Kind>> {
    if CALLS.fetch_add(1, Ordering::SeqCst) < 2 {
        return Err(Failure::new(Kind::Busy, "booking service busy"));
    }
    Ok(format!("reserved {}", seat))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut retry = Retry::builder([Kind::Busy])
        .total_tries(3)
        .initial_wait(0.1)
        .build()
        .expect("valid configuration");

    match retry.call_async(|(seat,)| reserve(seat), ("14C",)).await {
        Ok(message) => println!("{}", message),
        Err(err) => panic!("Failed to reserve: {}", err),
    }
}
