//! Logger handles returned by the registry.

use std::fmt;
use std::sync::Arc;

use welder_types::LogLevel;

use super::registry::Shared;

/// A named logger writing through the registry's shared sinks.
///
/// Handles are cheap to clone and can be moved across threads. A record is
/// written when its level is at least the logger's effective level: the
/// nearest level set on this logger or one of its dotted ancestors, falling
/// back to the root, which lets everything through unless configured.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    name: Arc<str>,
    path: Option<Arc<str>>,
}

impl Logger {
    pub(crate) fn new(shared: Arc<Shared>, name: String, path: Option<String>) -> Self {
        Self {
            shared,
            name: name.into(),
            path: path.map(Into::into),
        }
    }

    /// Name written into records, e.g. `arc_welder.preprocessor`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the root logger.
    pub fn is_root(&self) -> bool {
        self.path.is_none()
    }

    /// A nested logger (`arc_welder.a` gives `arc_welder.a.b`).
    ///
    /// Nested loggers are not added to the registry's known children, so
    /// reconfiguration does not assign them a level; they inherit from their
    /// parent.
    pub fn child(&self, suffix: &str) -> Logger {
        let path = match &self.path {
            Some(path) => format!("{}.{}", path, suffix),
            None => suffix.to_string(),
        };
        Logger::new(
            self.shared.clone(),
            format!("{}.{}", self.name, suffix),
            Some(path),
        )
    }

    /// Whether a record at `level` would currently be written.
    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        self.shared.is_enabled(self.path.as_deref(), level)
    }

    /// Emit a record.
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.shared
            .emit(self.path.as_deref(), &self.name, level, message.as_ref());
    }

    /// Emit a record built from format arguments, formatting only if enabled.
    pub fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if self.is_enabled_for(level) {
            self.log(level, args.to_string());
        }
    }

    /// Emit a `VERBOSE` record.
    pub fn verbose(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Verbose, message);
    }

    /// Emit a `DEBUG` record.
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    /// Emit an `INFO` record.
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    /// Emit a `WARNING` record.
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    /// Emit an `ERROR` record.
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    /// Emit a `CRITICAL` record.
    pub fn critical(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Critical, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("name", &self.name).finish()
    }
}

/// Log through a [`Logger`] with `format!`-style arguments.
///
/// ```ignore
/// welder_log!(logger, LogLevel::Info, "Processed {} of {} lines", done, total);
/// ```
#[macro_export]
macro_rules! welder_log {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger.log_fmt($level, format_args!($($arg)*))
    };
}
