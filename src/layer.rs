use crate::level::Level;
use crate::logger::Logger;
use crate::record::Fields;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns every `tracing` event into one
/// record written through a [`Logger`].
///
/// Event fields become record fields and the `message` field becomes the
/// record message. The event's source location and target are attached as
/// `target`, `file` and `line` fields unless the event already sets them.
/// Events emitted by this crate itself are skipped so that sink diagnostics
/// cannot feed back into the sink.
pub struct LoggerLayer {
    logger: Logger,
    /// Events forwarded to the logger.
    pub forwarded_events: Arc<AtomicU64>,
    /// Events skipped because they originate from this crate.
    pub skipped_events: Arc<AtomicU64>,
}

impl LoggerLayer {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            forwarded_events: Arc::new(AtomicU64::new(0)),
            skipped_events: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target() == crate::SELF_TARGET {
            self.skipped_events.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let mut fields = Fields::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        fields
            .entry("target".to_string())
            .or_insert_with(|| meta.target().into());
        if let Some(file) = meta.file() {
            fields.entry("file".to_string()).or_insert_with(|| file.into());
        }
        if let Some(line) = meta.line() {
            fields.entry("line".to_string()).or_insert_with(|| line.into());
        }

        self.logger
            .with_fields(fields)
            .output(Level::from(*meta.level()), message.unwrap_or_default());
        self.forwarded_events.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut Fields,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `tracing` passes the formatted message through here.
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(format!("{:?}", value)));
        }
    }
}
