use crate::backend::{make_sink_from_config, parse_dsn, DsnError, SinkBuildError, SinkConfig};
use crate::env::{
    env_opt, env_or, LOG_CALLER_SKIP_ENV, LOG_FILE_EXT_ENV, LOG_FILE_NAME_ENV, LOG_FLAGS_ENV,
    LOG_PREFIX_ENV, LOG_SAVE_PATH_ENV, LOG_SINK_DSN_ENV,
};
use crate::logger::Logger;
use crate::writer::{LineFlags, ParseFlagsError};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Root logger configuration.
///
/// **Fields**
/// - `sink`: where lines go.
/// - `prefix`: text placed in front of every line.
/// - `flags`: line header options, [`LineFlags::STD`] by default.
/// - `caller_skip`: when set, the root logger captures one caller frame at
///   construction, counted from [`init_logger`] itself (0) outward.
#[derive(Clone, Debug)]
pub struct LoggerConfig {
    pub sink: SinkConfig,
    pub prefix: String,
    pub flags: LineFlags,
    pub caller_skip: Option<usize>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            sink: SinkConfig::new(crate::backend::SinkKind::Stdout, "stdout"),
            prefix: String::new(),
            flags: LineFlags::STD,
            caller_skip: None,
        }
    }
}

/// Error type returned while reading configuration or building the root
/// logger.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Dsn(#[from] DsnError),

    #[error(transparent)]
    Flags(#[from] ParseFlagsError),

    #[error("invalid LOG_CALLER_SKIP value {0:?}")]
    CallerSkip(String),

    #[error(transparent)]
    Sink(#[from] SinkBuildError),
}

impl LoggerConfig {
    /// Build a configuration from the `LOG_*` environment variables.
    ///
    /// If `LOG_SAVE_PATH` is set, the sink is the file
    /// `<LOG_SAVE_PATH>/<LOG_FILE_NAME><LOG_FILE_EXT>` (defaults `app` and
    /// `.log`). Otherwise `LOG_SINK_DSN` is parsed, defaulting to stdout.
    pub fn from_env() -> Result<Self, InitError> {
        let mut config = LoggerConfig::default();

        if let Some(dir) = env_opt(LOG_SAVE_PATH_ENV) {
            let file_name = format!(
                "{}{}",
                env_or(LOG_FILE_NAME_ENV, "app"),
                env_or(LOG_FILE_EXT_ENV, ".log")
            );
            config.sink = SinkConfig::file(PathBuf::from(dir).join(file_name));
        } else if let Some(dsn) = env_opt(LOG_SINK_DSN_ENV) {
            config.sink = parse_dsn(&dsn)?;
        }

        config.prefix = env_or(LOG_PREFIX_ENV, "");
        if let Some(flags) = env_opt(LOG_FLAGS_ENV) {
            config.flags = flags.parse()?;
        }
        if let Some(skip) = env_opt(LOG_CALLER_SKIP_ENV) {
            let parsed = skip
                .trim()
                .parse()
                .map_err(|_| InitError::CallerSkip(skip.clone()))?;
            config.caller_skip = Some(parsed);
        }

        Ok(config)
    }
}

/// Build the root logger described by `config`.
///
/// **Returns**
/// - `Err(InitError::Sink(..))` if the sink cannot be constructed, e.g.
///   the log file cannot be opened. This is the only failure path; logging
///   calls on the returned logger never fail.
pub fn init_logger(config: &LoggerConfig) -> Result<Logger, InitError> {
    let sink = make_sink_from_config(&config.sink)?;
    let logger = Logger::new(sink, config.prefix.clone(), config.flags);
    tracing::debug!(
        target: crate::SELF_TARGET,
        dsn = %config.sink.dsn,
        flags = ?config.flags,
        "logger initialized"
    );
    Ok(match config.caller_skip {
        Some(skip) => logger.with_caller(skip),
        None => logger,
    })
}

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide logger. The first call wins; later calls hand
/// the rejected logger back.
pub fn set_global(logger: Logger) -> Result<(), Logger> {
    GLOBAL.set(logger)
}

/// The process-wide logger, if one was installed.
pub fn global() -> Option<&'static Logger> {
    GLOBAL.get()
}

/// Install a global `tracing` subscriber that forwards every event into
/// `logger`.
///
/// **Parameters**
/// - `logger`: destination for bridged events; its fields, context and
///   callers are carried into every record.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt` layer is
///   added as well, so events are also printed to the console.
///
/// Returns `false` if a global subscriber was already set.
#[cfg(feature = "bridge")]
pub fn init_tracing_bridge(logger: Logger, enable_stdout: bool) -> bool {
    use crate::layer::LoggerLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    let layer = LoggerLayer::new(logger);

    // Two subscriber shapes because the layered types differ.
    if enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber).is_ok()
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SinkKind;

    #[test]
    fn default_is_stdout_with_std_flags() {
        let config = LoggerConfig::default();
        assert_eq!(config.sink.kind, SinkKind::Stdout);
        assert_eq!(config.flags, LineFlags::STD);
        assert!(config.prefix.is_empty());
        assert!(config.caller_skip.is_none());
    }

    #[test]
    fn init_reports_sink_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig {
            sink: SinkConfig::file(dir.path()),
            ..LoggerConfig::default()
        };
        assert!(matches!(init_logger(&config), Err(InitError::Sink(_))));
    }

    #[test]
    fn init_applies_prefix_and_flags() {
        let config = LoggerConfig {
            sink: SinkConfig::new(SinkKind::Noop, "noop"),
            prefix: "svc ".into(),
            flags: LineFlags::DATE | LineFlags::UTC,
            caller_skip: None,
        };
        let logger = init_logger(&config).unwrap();
        assert_eq!(logger.prefix(), "svc ");
        assert_eq!(logger.flags(), LineFlags::DATE | LineFlags::UTC);
    }
}
