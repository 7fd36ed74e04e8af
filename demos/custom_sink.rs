use std::sync::Arc;

use ctx_logger::sink::{LogSink, SinkError};
use ctx_logger::{LineFlags, Logger};
use serde_json::json;

/// Example of integrating a completely custom destination by implementing
/// the `LogSink` trait directly.
struct TaggedStdoutSink {
    tag: &'static str,
}

impl LogSink for TaggedStdoutSink {
    fn write(&self, line: &[u8]) -> Result<(), SinkError> {
        // Here you would hand the bytes to your own client library.
        print!("[{}] {}", self.tag, String::from_utf8_lossy(line));
        Ok(())
    }
}

fn main() {
    let sink: Arc<dyn LogSink> = Arc::new(TaggedStdoutSink { tag: "custom" });
    let log = Logger::new(sink, "", LineFlags::NONE);

    log.info("custom sink example started");
    log.with_field("db", json!("my-custom-db"))
        .error("simulated error sent via custom sink");
}
