use std::path::PathBuf;
use std::sync::Arc;

use crate::file::{FileSink, StderrSink, StdoutSink};
use crate::memory_sink::MemorySink;
use crate::noop_sink::NoopSink;
use crate::sink::LogSink;

/// Supported sink kinds that can be selected via DSN or config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    Stdout,
    Stderr,
    Noop,
    Memory,
    File(PathBuf),
}

/// Sink configuration built from a DSN or explicit fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Selected sink implementation.
    pub kind: SinkKind,
    /// Raw DSN that was used to construct this config.
    pub dsn: String,
}

impl SinkConfig {
    pub fn new(kind: SinkKind, dsn: impl Into<String>) -> Self {
        SinkConfig { kind, dsn: dsn.into() }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let dsn = format!("file://{}", path.display());
        SinkConfig::new(SinkKind::File(path), dsn)
    }
}

/// Parse a DSN string and infer the sink kind from it.
///
/// Examples:
/// - "stdout", "stderr", "noop", "memory"
/// - "file:///var/log/app/service.log"
/// - "storage/logs/app.log" (bare path ending in `.log`)
pub fn parse_dsn(dsn: &str) -> Result<SinkConfig, DsnError> {
    let trimmed = dsn.trim();
    let lower = trimmed.to_ascii_lowercase();

    let kind = match lower.as_str() {
        "" => return Err(DsnError::Empty),
        "stdout" | "stdout://" => SinkKind::Stdout,
        "stderr" | "stderr://" => SinkKind::Stderr,
        "noop" | "noop://" => SinkKind::Noop,
        "memory" | "memory://" => SinkKind::Memory,
        _ if lower.starts_with("file://") => {
            let path = &trimmed["file://".len()..];
            if path.is_empty() {
                return Err(DsnError::MissingPath);
            }
            SinkKind::File(PathBuf::from(path))
        }
        _ if lower.ends_with(".log") && !lower.contains("://") => {
            SinkKind::File(PathBuf::from(trimmed))
        }
        _ => return Err(DsnError::UnknownScheme(trimmed.to_string())),
    };

    Ok(SinkConfig::new(kind, trimmed))
}

/// Error type returned when parsing a DSN.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DsnError {
    #[error("empty sink DSN")]
    Empty,

    #[error("file DSN has no path")]
    MissingPath,

    #[error("unknown or unsupported DSN scheme: {0:?}")]
    UnknownScheme(String),
}

/// Error type returned when building a sink from configuration.
#[derive(thiserror::Error, Debug)]
pub enum SinkBuildError {
    #[error("cannot open log file {path:?}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Create a concrete `LogSink` implementation from a `SinkConfig`.
///
/// This is the main entry point for applications that want to select
/// a sink using a single DSN string instead of constructing sinks
/// manually.
pub fn make_sink_from_config(cfg: &SinkConfig) -> Result<Arc<dyn LogSink>, SinkBuildError> {
    let sink: Arc<dyn LogSink> = match &cfg.kind {
        SinkKind::Stdout => Arc::new(StdoutSink),
        SinkKind::Stderr => Arc::new(StderrSink),
        SinkKind::Noop => Arc::new(NoopSink),
        SinkKind::Memory => Arc::new(MemorySink::new()),
        SinkKind::File(path) => {
            let sink = FileSink::open(path).map_err(|source| SinkBuildError::OpenFile {
                path: path.clone(),
                source,
            })?;
            Arc::new(sink)
        }
    };
    Ok(sink)
}
