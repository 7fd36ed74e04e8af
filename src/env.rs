/// Environment variable names used by this crate for convenient
/// configuration of loggers from services.
///
/// These are purely helpers; the core logger and sink types remain
/// decoupled from environment access.

/// Sink DSN, e.g. `stdout` or `file:///var/log/app.log`.
pub const LOG_SINK_DSN_ENV: &str = "LOG_SINK_DSN";

/// Directory for the log file. Takes precedence over `LOG_SINK_DSN`.
pub const LOG_SAVE_PATH_ENV: &str = "LOG_SAVE_PATH";

/// Log file base name, joined with the save path.
pub const LOG_FILE_NAME_ENV: &str = "LOG_FILE_NAME";

/// Log file extension including the dot, e.g. `.log`.
pub const LOG_FILE_EXT_ENV: &str = "LOG_FILE_EXT";

/// Text placed in front of every line.
pub const LOG_PREFIX_ENV: &str = "LOG_PREFIX";

/// Comma separated line flags, e.g. `date,time,utc` or `std`.
pub const LOG_FLAGS_ENV: &str = "LOG_FLAGS";

/// Optional caller depth captured on the root logger.
pub const LOG_CALLER_SKIP_ENV: &str = "LOG_CALLER_SKIP";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an environment variable, treating an empty value as unset.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
