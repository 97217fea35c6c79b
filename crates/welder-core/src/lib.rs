//! # Welder Core
//!
//! Logging plumbing for the Arc Welder gcode plugin.
//!
//! This crate provides:
//!
//! - **Registry**: one root logger, named child loggers created on demand,
//!   and per-child level policy driven by the host's settings
//! - **Sinks**: a daily rotating file and the console, each drained by its
//!   own background writer so emitting never waits on I/O
//! - **Rotation**: forced rollover and clearing of every rotated file
//! - **Tracing bridge**: a `tracing` layer feeding events into the registry
//! - **Configuration**: loading logging settings from YAML or JSON files
//!
//! ## Example
//!
//! ```no_run
//! use welder_core::{config::LoggingConfig, log::LoggingRegistry};
//! use welder_types::RegistryNames;
//!
//! let registry = LoggingRegistry::new(RegistryNames::default());
//! let logger = registry.get_logger("__init__");
//!
//! let config = LoggingConfig::load("~/.octoprint/arc_welder/logging.yaml")?;
//! config.apply_to(&registry)?;
//!
//! logger.info("Startup Complete.");
//! # Ok::<(), welder_types::WelderError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod time;
pub mod util;

// Re-export commonly used items
pub use config::LoggingConfig;
pub use log::{Logger, LoggingRegistry, RegistryLayer};
pub use welder_types::{LogLevel, LoggingSettings, RegistryNames, Result, WelderError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
