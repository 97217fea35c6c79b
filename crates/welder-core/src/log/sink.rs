//! Asynchronous output sinks.
//!
//! Every sink owns a bounded queue drained by a dedicated writer thread, so
//! emitting a record only enqueues the formatted line. Dropping a sink asks
//! its worker to shut down once the queue is written out, waiting for it only a
//! bounded time.

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use welder_types::{LogLevel, Result};

use super::rotation::{RotatingFile, SharedRotatingFile, BACKUP_COUNT};

/// Maximum number of lines waiting in a sink's queue before emitters block.
pub const QUEUE_CAPACITY: usize = 8_192;

/// Where a sink writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// Rotating log file
    File,
    /// Standard error
    Console,
}

/// An attached output destination with its own background writer.
pub struct Sink {
    kind: SinkKind,
    min_level: LogLevel,
    writer: NonBlocking,
    file: Option<SharedRotatingFile>,
    _guard: WorkerGuard,
}

impl Sink {
    /// Rotating file sink keeping [`BACKUP_COUNT`] daily backups.
    pub fn file(path: impl AsRef<Path>, min_level: LogLevel) -> Result<Self> {
        let file = SharedRotatingFile::new(RotatingFile::open(path, BACKUP_COUNT)?);
        let (writer, guard) = spawn_worker(file.clone(), "arc-welder-file-log");
        Ok(Self {
            kind: SinkKind::File,
            min_level,
            writer,
            file: Some(file),
            _guard: guard,
        })
    }

    /// Console sink writing to standard error.
    pub fn console(min_level: LogLevel) -> Self {
        let (writer, guard) = spawn_worker(io::stderr(), "arc-welder-console-log");
        Self {
            kind: SinkKind::Console,
            min_level,
            writer,
            file: None,
            _guard: guard,
        }
    }

    /// Kind of destination.
    pub fn kind(&self) -> SinkKind {
        self.kind
    }

    /// Minimum level this sink accepts.
    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Whether a record at `level` passes this sink.
    pub fn accepts(&self, level: LogLevel) -> bool {
        level != LogLevel::Silent && level >= self.min_level
    }

    /// The rotating file behind a file sink.
    pub fn rotating_file(&self) -> Option<&SharedRotatingFile> {
        self.file.as_ref()
    }

    /// Queue one formatted line (including its newline) for writing.
    pub fn write_line(&self, line: &str) {
        let mut writer = self.writer.clone();
        // Nothing useful can be done with a failed log write.
        let _ = writer.write_all(line.as_bytes());
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("kind", &self.kind)
            .field("min_level", &self.min_level)
            .field("path", &self.file.as_ref().map(|file| file.lock().path().to_path_buf()))
            .finish()
    }
}

fn spawn_worker<W>(writer: W, thread_name: &str) -> (NonBlocking, WorkerGuard)
where
    W: Write + Send + 'static,
{
    NonBlockingBuilder::default()
        .lossy(false)
        .buffered_lines_limit(QUEUE_CAPACITY)
        .thread_name(thread_name)
        .finish(writer)
}
