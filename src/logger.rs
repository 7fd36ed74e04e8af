use crate::caller::{self, CallerFrame, MAX_CALLER_DEPTH};
use crate::context::TraceContext;
use crate::level::Level;
use crate::record::{Fields, LogRecord};
use crate::sink::LogSink;
use crate::writer::{LineFlags, LineWriter};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Immutable, cheaply clonable logger.
///
/// Every `with_*` method returns a new logger that shares the sink with its
/// parent and differs from it in exactly one attribute. The parent is never
/// modified, so a configured logger can be kept as a template and derived
/// from concurrently.
///
/// ```
/// use std::sync::Arc;
/// use ctx_logger::{Logger, LineFlags, MemorySink};
/// use serde_json::json;
///
/// let sink = MemorySink::new();
/// let log = Logger::new(Arc::new(sink.clone()), "", LineFlags::NONE);
/// log.with_field("req_id", json!("abc")).infof(format_args!("start {}", "job1"));
/// assert_eq!(sink.lines().len(), 1);
/// ```
#[derive(Clone)]
pub struct Logger {
    writer: Arc<LineWriter>,
    context: Option<TraceContext>,
    fields: Arc<Fields>,
    callers: Arc<[String]>,
}

impl Logger {
    /// Root logger with no fields, no context and no captured callers.
    ///
    /// **Parameters**
    /// - `sink`: shared destination for rendered lines.
    /// - `prefix`: text placed in front of every line (see [`LineFlags::MSG_PREFIX`]).
    /// - `flags`: line header options.
    pub fn new(sink: Arc<dyn LogSink>, prefix: impl Into<String>, flags: LineFlags) -> Self {
        Logger {
            writer: Arc::new(LineWriter::new(sink, prefix, flags)),
            context: None,
            fields: Arc::new(Fields::new()),
            callers: Arc::from(Vec::new()),
        }
    }

    /// Merge `extra` into a copy of this logger's fields. Keys already
    /// present are overwritten.
    pub fn with_fields<I, K>(&self, extra: I) -> Logger
    where
        I: IntoIterator<Item = (K, serde_json::Value)>,
        K: Into<String>,
    {
        let mut child = self.clone();
        // Copies the map only while the parent still holds it.
        let fields = Arc::make_mut(&mut child.fields);
        for (key, value) in extra {
            fields.insert(key.into(), value);
        }
        child
    }

    /// Single-field shorthand for [`Logger::with_fields`].
    pub fn with_field(&self, key: impl Into<String>, value: serde_json::Value) -> Logger {
        let key: String = key.into();
        self.with_fields([(key, value)])
    }

    /// Replace the trace context. Any value is accepted.
    pub fn with_context(&self, context: impl Into<TraceContext>) -> Logger {
        let mut child = self.clone();
        child.context = Some(context.into());
        child
    }

    /// Replace the captured callers with the single frame `skip` levels
    /// above this call (0 = the code calling `with_caller`).
    ///
    /// If that frame cannot be resolved the child keeps the parent's callers.
    #[track_caller]
    #[inline(never)]
    pub fn with_caller(&self, skip: usize) -> Logger {
        let site = Location::caller();
        let mut child = self.clone();
        if let Some(frame) = caller::capture_one("Logger::with_caller", skip, site) {
            child.callers = Arc::from(vec![frame.to_string()]);
        }
        child
    }

    /// Replace the captured callers with the current stack, immediate caller
    /// first, truncated to [`MAX_CALLER_DEPTH`] frames.
    #[inline(never)]
    pub fn with_callers_frames(&self) -> Logger {
        let frames: Vec<String> = caller::capture_all("Logger::with_callers_frames", MAX_CALLER_DEPTH)
            .iter()
            .map(CallerFrame::to_string)
            .collect();
        let mut child = self.clone();
        child.callers = Arc::from(frames);
        child
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn context(&self) -> Option<&TraceContext> {
        self.context.as_ref()
    }

    pub fn callers(&self) -> &[String] {
        &self.callers
    }

    pub fn prefix(&self) -> &str {
        self.writer.prefix()
    }

    pub fn flags(&self) -> LineFlags {
        self.writer.flags()
    }

    /// Build the record `output` would write, without writing it.
    pub fn record(&self, level: Level, message: impl Into<String>) -> LogRecord {
        LogRecord::build(level, message, self.context.as_ref(), &self.callers, &self.fields)
    }

    /// Serialize one record and write it to the sink.
    ///
    /// The level only labels the record: every level takes the same path,
    /// and `Fatal`/`Panic` neither exit nor unwind.
    pub fn output(&self, level: Level, message: impl Into<String>) {
        let body = self.record(level, message).to_json_bytes();
        self.writer.print(&body);
    }

    pub fn flush(&self) {
        self.writer.flush();
    }

    pub fn debug(&self, msg: impl fmt::Display) {
        self.output(Level::Debug, msg.to_string());
    }

    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.output(Level::Debug, fmt::format(args));
    }

    pub fn info(&self, msg: impl fmt::Display) {
        self.output(Level::Info, msg.to_string());
    }

    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.output(Level::Info, fmt::format(args));
    }

    pub fn warn(&self, msg: impl fmt::Display) {
        self.output(Level::Warn, msg.to_string());
    }

    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.output(Level::Warn, fmt::format(args));
    }

    pub fn error(&self, msg: impl fmt::Display) {
        self.output(Level::Error, msg.to_string());
    }

    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.output(Level::Error, fmt::format(args));
    }

    pub fn fatal(&self, msg: impl fmt::Display) {
        self.output(Level::Fatal, msg.to_string());
    }

    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.output(Level::Fatal, fmt::format(args));
    }

    pub fn panic(&self, msg: impl fmt::Display) {
        self.output(Level::Panic, msg.to_string());
    }

    pub fn panicf(&self, args: fmt::Arguments<'_>) {
        self.output(Level::Panic, fmt::format(args));
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("writer", &self.writer)
            .field("context", &self.context)
            .field("fields", &self.fields)
            .field("callers", &self.callers)
            .finish()
    }
}

/// Concatenate displayable values with no separator, for the
/// value-list form of the leveled methods.
///
/// ```
/// let msg = ctx_logger::concat_values!("user ", 42, " logged in");
/// assert_eq!(msg, "user 42 logged in");
/// ```
#[macro_export]
macro_rules! concat_values {
    ($($value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut out = ::std::string::String::new();
        $(
            let _ = ::std::fmt::Write::write_fmt(&mut out, format_args!("{}", $value));
        )*
        out
    }};
}
