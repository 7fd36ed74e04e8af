use crate::context::TraceContext;
use crate::level::Level;
use chrono::Local;
use serde::Serialize;
use std::collections::BTreeMap;

/// Structured field values attached to a logger.
pub type Fields = BTreeMap<String, serde_json::Value>;

/// Keys every record carries. Caller fields with one of these names are
/// dropped when the record is built.
pub const FIXED_KEYS: [&str; 5] = ["level", "context", "time", "message", "callers"];

/// One emission, built at output time and discarded once written.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub level: Level,
    pub context: Option<TraceContext>,
    /// Local wall-clock time in nanoseconds since the Unix epoch.
    pub time: i64,
    pub message: String,
    pub callers: Vec<String>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl LogRecord {
    pub fn build(
        level: Level,
        message: impl Into<String>,
        context: Option<&TraceContext>,
        callers: &[String],
        fields: &Fields,
    ) -> Self {
        let now = Local::now();
        // Outside the i64 nanosecond range (years 1677..2262) fall back to micros scaled up.
        let time = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));

        let fields = fields
            .iter()
            .filter(|(k, _)| !FIXED_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        LogRecord {
            level,
            context: context.cloned(),
            time,
            message: message.into(),
            callers: callers.to_vec(),
            fields,
        }
    }

    /// Render the record as one JSON object. A serialization failure yields
    /// an empty payload rather than an error.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}
