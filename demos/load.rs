use std::sync::Arc;
use std::time::Instant;

use ctx_logger::noop_sink::NoopSink;
use ctx_logger::{LineFlags, Logger};
use serde_json::json;

fn main() {
    let log = Logger::new(Arc::new(NoopSink), "", LineFlags::STD)
        .with_field("service", json!("load"));

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        log.with_field("iteration", json!(i)).error("load test error");
    }

    let elapsed = start.elapsed();
    println!("sent {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    let start = Instant::now();
    for _ in 0..1_000 {
        log.with_caller(0).info("with caller");
    }
    println!("1000 single-frame captures in {:?}", start.elapsed());
}
