pub mod level;
pub mod context;
pub mod record;
pub mod caller;
pub mod sink;
pub mod writer;
pub mod logger;

pub mod noop_sink;
pub mod memory_sink;
pub mod file;

pub mod backend;
pub mod env;
pub mod init;

#[cfg(feature = "bridge")]
pub mod layer;

pub use context::TraceContext;
pub use level::Level;
pub use logger::Logger;
pub use memory_sink::MemorySink;
pub use record::{Fields, LogRecord};
pub use sink::LogSink;
pub use writer::LineFlags;

/// `tracing` target for diagnostics about the logger itself.
pub const SELF_TARGET: &str = "ctx_logger::internal";
