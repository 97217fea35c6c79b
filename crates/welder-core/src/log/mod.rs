//! Logging registry for Arc Welder.
//!
//! The registry hands out named child loggers under one root namespace,
//! owns at most one rotating file sink and one console sink, and applies a
//! per-child level policy whenever the host reconfigures it.
//!
//! ```no_run
//! use std::path::Path;
//! use welder_core::log::LoggingRegistry;
//! use welder_types::{LogLevel, LoggingSettings, RegistryNames};
//!
//! let registry = LoggingRegistry::new(RegistryNames::default());
//! let logger = registry.get_logger("octoprint_arc_welder.preprocessor");
//!
//! let settings = LoggingSettings::default()
//!     .with_enabled_logger("arc_welder.preprocessor", LogLevel::Info);
//! registry.configure_loggers(Some(Path::new("logs/plugin_arc_welder.log")), Some(&settings))?;
//!
//! logger.info("Received a new gcode file for processing.");
//! registry.do_rollover(false)?;
//! # Ok::<(), welder_types::WelderError>(())
//! ```

pub mod bridge;
pub mod format;
pub mod logger;
pub mod policy;
pub mod registry;
pub mod rotation;
pub mod sink;

pub use bridge::RegistryLayer;
pub use format::{Formatter, LogRecord};
pub use logger::Logger;
pub use registry::{LoggingRegistry, SinkState, DEFAULT_LEVEL};
pub use rotation::{RotatingFile, BACKUP_COUNT};
pub use sink::{Sink, SinkKind};
