//! Persistence sinks for rendered reports.

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Destination for the serialized report bytes.
///
/// Sinks are moved to the dump worker in deferred mode, hence `Send`.
pub trait ReportSink: Send {
    /// Writes the whole report. Partial writes are reported as errors.
    fn persist(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Human-readable name of the destination, used in log lines.
    fn describe(&self) -> String;
}

impl<S: ReportSink + ?Sized> ReportSink for Box<S> {
    fn persist(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).persist(bytes)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Appends the report to a file, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSink { path: path.into() }
    }

    /// A sink writing to `dir/<prefix>-YYYYMMDD-HHMMSS.txt`, stamped with the
    /// current local time.
    pub fn timestamped(dir: impl AsRef<Path>, prefix: &str) -> Self {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        FileSink::new(dir.as_ref().join(format!("{prefix}-{stamp}.txt")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileSink {
    fn persist(&mut self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(bytes)?;
        file.flush()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Adapts any writer (stdout, a `Vec<u8>`, a socket) into a sink.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    name: String,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W, name: impl Into<String>) -> Self {
        WriterSink {
            writer,
            name: name.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ReportSink for WriterSink<W> {
    fn persist(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
