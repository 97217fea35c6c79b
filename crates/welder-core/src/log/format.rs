//! Log records and the shared record formatter.

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use welder_types::LogLevel;

use crate::time::format_log_time;

/// A single log record, captured at emission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// When the record was created
    pub timestamp: DateTime<Local>,
    /// Fully-qualified name of the emitting logger
    pub logger: String,
    /// Severity of the record
    pub level: LogLevel,
    /// Rendered message
    pub message: String,
}

impl LogRecord {
    /// Capture a record stamped with the current local time.
    pub fn new(logger: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            logger: logger.into(),
            level,
            message: message.into(),
        }
    }
}

/// Renders records as `<timestamp> - <logger> - <LEVEL> - <message>`.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    date_format: Option<String>,
}

impl Formatter {
    /// Formatter with the default `YYYY-MM-DD HH:MM:SS,mmm` timestamp.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a strftime-style pattern for the timestamp instead of the default.
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = Some(date_format.into());
        self
    }

    /// Render the timestamp part of a record.
    ///
    /// A pattern chrono cannot render falls back to the default timestamp.
    pub fn format_time(&self, timestamp: DateTime<Local>) -> String {
        if let Some(pattern) = &self.date_format {
            let mut out = String::new();
            if write!(out, "{}", timestamp.format(pattern)).is_ok() {
                return out;
            }
        }
        format_log_time(timestamp)
    }

    /// Render a record without a trailing newline.
    pub fn format(&self, record: &LogRecord) -> String {
        format!(
            "{} - {} - {} - {}",
            self.format_time(record.timestamp),
            record.logger,
            record.level,
            record.message
        )
    }
}
