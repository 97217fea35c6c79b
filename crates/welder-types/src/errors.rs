//! Error types for Arc Welder logging operations.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the logging registry.
///
/// Filesystem failures carry the path they happened on so that the host can
/// report which log location could not be prepared.
#[derive(Error, Debug)]
pub enum WelderError {
    /// Creating, rotating, or removing a log file failed
    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        /// Path of the file or directory being touched
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl WelderError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WelderError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// A specialized Result type for Arc Welder logging operations.
pub type Result<T> = std::result::Result<T, WelderError>;

/// Helper macro to bail out with a WelderError
///
/// This is used for expected error conditions.
///
/// # Example
///
/// ```ignore
/// if !valid {
///     bail!(Validation, "Invalid log level: {}", raw);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::WelderError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::WelderError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::WelderError::Other($msg.to_string()))
    };
}
