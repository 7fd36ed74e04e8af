use std::error::Error;

/// Error type returned by sink writes.
pub type SinkError = Box<dyn Error + Send + Sync>;

/// Synchronous destination for rendered log lines.
///
/// A logger and every logger derived from it share one sink, so
/// implementations must tolerate concurrent `write` calls from several
/// threads. Each call carries exactly one complete line.
pub trait LogSink: Send + Sync {
    /// Write one rendered line.
    ///
    /// **Parameters**
    /// - `line`: the serialized record, newline-terminated.
    ///
    /// **Returns**
    /// - `Ok(())` if the bytes were accepted.
    /// - `Err(..)` on I/O failure. The logger swallows the error; it never
    ///   reaches the code that emitted the record.
    fn write(&self, line: &[u8]) -> Result<(), SinkError>;

    /// Flush buffered bytes, if the sink buffers.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
