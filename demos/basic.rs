use std::sync::Arc;

use ctx_logger::file::StdoutSink;
use ctx_logger::{LineFlags, Logger};
use serde_json::json;

fn handle_request(log: &Logger, req_id: &str) {
    let log = log
        .with_context(json!({ "request_id": req_id }))
        .with_fields([("route", json!("/api/v1/articles"))]);

    log.infof(format_args!("{}: request accepted", req_id));
    log.with_caller(0).warn("slow query");
}

fn main() {
    let log = Logger::new(Arc::new(StdoutSink), "[blog] ", LineFlags::STD)
        .with_field("service", json!("blog-service"));

    handle_request(&log, "req-1");
    handle_request(&log, "req-2");

    // Full stack for the unexpected path; the process keeps running.
    log.with_callers_frames().panic("invariant violated");
    log.info(ctx_logger::concat_values!("handled ", 2, " requests"));
}
