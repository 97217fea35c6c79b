//! Configuration types and structures.

use serde::{Deserialize, Serialize};
use crate::LogLevel;

/// Identifiers used to build the logger namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryNames {
    /// Name of the root logger (e.g., "arc_welder")
    pub root: String,
    /// Prefix of fully-qualified child names (e.g., "arc_welder.")
    pub entry_prefix: String,
    /// Prefix of module-style names passed by callers (e.g., "octoprint_arc_welder.")
    pub file_prefix: String,
}

impl RegistryNames {
    /// Build the identifiers from their three parts.
    pub fn new(
        root: impl Into<String>,
        entry_prefix: impl Into<String>,
        file_prefix: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            entry_prefix: entry_prefix.into(),
            file_prefix: file_prefix.into(),
        }
    }
}

impl Default for RegistryNames {
    fn default() -> Self {
        Self::new("arc_welder", "arc_welder.", "octoprint_arc_welder.")
    }
}

/// A per-logger level override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledLogger {
    /// Fully-qualified logger name (e.g., "arc_welder.gcode_conversion")
    pub name: String,
    /// Level the logger should run at
    pub log_level: LogLevel,
}

impl EnabledLogger {
    /// Create an override.
    pub fn new(name: impl Into<String>, log_level: LogLevel) -> Self {
        Self {
            name: name.into(),
            log_level,
        }
    }
}

/// Logging settings supplied by the host on every reconfiguration.
///
/// Every field is optional; an absent field falls back to the registry's
/// built-in behavior rather than to [`LoggingSettings::plugin_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Level applied to every child when no settings are supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_log_level: Option<LogLevel>,

    /// Whether to attach the console sink (attached unless explicitly false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_to_console: Option<bool>,

    /// Loggers that are explicitly enabled, with their levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_loggers: Option<Vec<EnabledLogger>>,
}

impl LoggingSettings {
    /// The settings the plugin ships with: errors only, no console, nothing enabled.
    pub fn plugin_defaults() -> Self {
        Self {
            default_log_level: Some(LogLevel::Error),
            log_to_console: Some(false),
            enabled_loggers: Some(Vec::new()),
        }
    }

    /// Whether the console sink should be attached.
    pub fn console_enabled(&self) -> bool {
        self.log_to_console.unwrap_or(true)
    }

    /// Find the override for a fully-qualified logger name (first match wins).
    pub fn enabled_logger(&self, full_name: &str) -> Option<&EnabledLogger> {
        self.enabled_loggers
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|logger| logger.name == full_name)
    }

    /// Level to hand to components that do their own filtering, such as the
    /// native gcode processor.
    ///
    /// Without an `enabled_loggers` list this is `Error`; with a list, a listed
    /// logger gets its level and an unlisted one gets `Critical`.
    pub fn logger_level(&self, full_name: &str) -> LogLevel {
        if self.enabled_loggers.is_none() {
            return LogLevel::Error;
        }
        self.enabled_logger(full_name)
            .map(|logger| logger.log_level)
            .unwrap_or(LogLevel::Critical)
    }

    /// Builder-style helper to add an override.
    pub fn with_enabled_logger(mut self, name: impl Into<String>, log_level: LogLevel) -> Self {
        self.enabled_loggers
            .get_or_insert_with(Vec::new)
            .push(EnabledLogger::new(name, log_level));
        self
    }
}
