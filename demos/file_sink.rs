use ctx_logger::init::{init_logger, LoggerConfig};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set LOG_SAVE_PATH=storage/logs to write into storage/logs/app.log.
    let config = LoggerConfig::from_env()?;
    let log = init_logger(&config)?;

    log.with_field("user_id", json!(42)).error("authentication failed");
    log.infof(format_args!("{}: service started", "debug"));
    log.flush();
    Ok(())
}
