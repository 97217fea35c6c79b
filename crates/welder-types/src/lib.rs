//! # Welder Types
//!
//! Core types shared across the Arc Welder logging crates.
//!
//! This crate provides the fundamental vocabulary of the logging registry:
//!
//! - The closed, ordered [`LogLevel`] enumeration (including the custom
//!   `VERBOSE` level and the "effectively silent" level above `CRITICAL`)
//! - The settings payload supplied by the host when it (re)configures logging
//! - The identifiers used to build the logger namespace
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use welder_types::{LogLevel, LoggingSettings};
//!
//! let settings: LoggingSettings = serde_json::from_str(
//!     r#"{"default_log_level": 40, "enabled_loggers": [{"name": "arc_welder.foo", "log_level": 20}]}"#,
//! ).unwrap();
//!
//! assert_eq!(settings.default_log_level, Some(LogLevel::Error));
//! assert_eq!(settings.logger_level("arc_welder.foo"), LogLevel::Info);
//! assert_eq!(settings.logger_level("arc_welder.bar"), LogLevel::Critical);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod enums;
pub mod config;

// Re-export common types for convenience
pub use errors::{WelderError, Result};
pub use enums::LogLevel;
pub use config::{EnabledLogger, LoggingSettings, RegistryNames};
