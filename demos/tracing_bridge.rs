use std::sync::Arc;

use ctx_logger::file::StdoutSink;
use ctx_logger::init::init_tracing_bridge;
use ctx_logger::{LineFlags, Logger};
use serde_json::json;
use tracing::{error, info};

fn main() {
    let log = Logger::new(Arc::new(StdoutSink), "", LineFlags::NONE)
        .with_field("service", json!("auth"));
    init_tracing_bridge(log, false);

    info!("starting service");

    error!(
        user_id = 42,
        reason = "invalid password",
        "authentication failed"
    );
}
