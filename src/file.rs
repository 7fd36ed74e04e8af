use crate::sink::{LogSink, SinkError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Sink over any [`Write`] implementation.
///
/// Writes are serialized through a mutex so each line lands contiguously
/// even when many threads log at once.
#[derive(Debug)]
pub struct WriterSink<W: Write + Send> {
    inner: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write(&self, line: &[u8]) -> Result<(), SinkError> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.write_all(line)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.flush()?;
        Ok(())
    }
}

/// Append-only log file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: WriterSink<File>,
}

impl FileSink {
    /// Open `path` for appending, creating the file and any missing parent
    /// directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: WriterSink::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write(&self, line: &[u8]) -> Result<(), SinkError> {
        self.writer.write(line)
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.writer.flush()
    }
}

/// Process standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write(&self, line: &[u8]) -> Result<(), SinkError> {
        io::stdout().lock().write_all(line)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        io::stdout().flush()?;
        Ok(())
    }
}

/// Process standard error.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write(&self, line: &[u8]) -> Result<(), SinkError> {
        io::stderr().lock().write_all(line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_sink_appends_lines() {
        let sink = WriterSink::new(Vec::new());
        sink.write(b"a\n").unwrap();
        sink.write(b"b\n").unwrap();
        assert_eq!(sink.into_inner(), b"a\nb\n");
    }

    #[test]
    fn file_sink_creates_parents_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/app.log");

        let sink = FileSink::open(&path).unwrap();
        sink.write(b"first\n").unwrap();
        drop(sink);

        let sink = FileSink::open(&path).unwrap();
        sink.write(b"second\n").unwrap();
        sink.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
