//! Logging configuration files.
//!
//! Hosts that keep their logging settings on disk can describe them in a
//! small YAML (or JSON) document:
//!
//! ```yaml
//! log_file: ~/.octoprint/logs/plugin_arc_welder.log
//! logging_configuration:
//!   default_log_level: 40
//!   log_to_console: false
//!   enabled_loggers:
//!     - name: arc_welder.gcode_conversion
//!       log_level: 20
//! ```
//!
//! ## Resolution order
//!
//! Values are resolved in this priority order:
//! 1. Environment variables (`ARC_WELDER_LOG_FILE`, `ARC_WELDER_LOG_TO_CONSOLE`)
//! 2. Values loaded from file
//! 3. The plugin's default settings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use welder_types::{bail, LoggingSettings, Result, WelderError};

use crate::log::LoggingRegistry;
use crate::util::expand_path;

/// Environment variable overriding the log file path.
pub const ENV_LOG_FILE: &str = "ARC_WELDER_LOG_FILE";

/// Environment variable overriding whether the console sink is attached.
pub const ENV_LOG_TO_CONSOLE: &str = "ARC_WELDER_LOG_TO_CONSOLE";

/// Logging configuration as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Path of the rotating log file (no file sink when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Settings payload handed to the registry
    #[serde(default = "LoggingSettings::plugin_defaults")]
    pub logging_configuration: LoggingSettings,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            logging_configuration: LoggingSettings::plugin_defaults(),
        }
    }
}

impl LoggingConfig {
    /// Load configuration from a file, then apply environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = expand_path(path);

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| WelderError::Config(format!("Failed to read config file: {}", e)))?;
            Self::from_yaml_str(&content)?
        } else {
            Self::default()
        };

        config.apply_overrides(
            std::env::var(ENV_LOG_FILE).ok(),
            std::env::var(ENV_LOG_TO_CONSOLE).ok(),
        )?;
        Ok(config)
    }

    /// Parse configuration from YAML (JSON is accepted too).
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let mut config: LoggingConfig = serde_yaml::from_str(content)
            .map_err(|e| WelderError::Config(format!("Failed to parse config: {}", e)))?;
        config.log_file = config.log_file.map(expand_path);
        Ok(config)
    }

    /// Save configuration to a file as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = expand_path(path);
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| WelderError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| WelderError::filesystem(parent, e))?;
        }
        fs::write(&path, yaml)
            .map_err(|e| WelderError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Reconfigure a registry with this configuration.
    pub fn apply_to(&self, registry: &LoggingRegistry) -> Result<()> {
        registry.configure_loggers(self.log_file.as_deref(), Some(&self.logging_configuration))
    }

    fn apply_overrides(&mut self, log_file: Option<String>, log_to_console: Option<String>) -> Result<()> {
        if let Some(file) = log_file.filter(|f| !f.trim().is_empty()) {
            self.log_file = Some(expand_path(file.trim()));
        }

        if let Some(raw) = log_to_console {
            let enabled = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => bail!(Validation, "Invalid value for {}: {}", ENV_LOG_TO_CONSOLE, raw),
            };
            self.logging_configuration.log_to_console = Some(enabled);
        }

        Ok(())
    }
}
