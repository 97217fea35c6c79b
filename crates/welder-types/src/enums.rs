//! Common enumerations used throughout the logging registry.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use crate::errors::{WelderError, Result};

/// Severity of a log record, and the threshold of a logger or sink.
///
/// Levels are ordered from the most verbose to the quietest. The numeric
/// values are the ones used by the host's settings format, so `Info` is `20`
/// and `Error` is `40`. `Silent` sits one above `Critical`: as a threshold it
/// blocks every record, and no record is ever emitted at that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    /// Very chatty diagnostics, below debug
    Verbose = 5,
    /// Debug messages
    Debug = 10,
    /// Informational messages
    Info = 20,
    /// Warnings
    Warning = 30,
    /// Errors
    Error = 40,
    /// Critical failures
    Critical = 50,
    /// Threshold that lets nothing through
    Silent = 51,
}

impl LogLevel {
    /// Every level, most verbose first.
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Verbose,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
        LogLevel::Silent,
    ];

    /// Numeric value of the level.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Map an arbitrary integer threshold onto the closed set of levels.
    ///
    /// Thresholds between two levels round up to the next defined level. A
    /// record passes a threshold when its value is at least the threshold, and
    /// records only ever carry defined levels, so rounding up admits exactly the
    /// same records as the raw number would.
    pub fn from_threshold(threshold: i64) -> Self {
        LogLevel::ALL
            .iter()
            .copied()
            .find(|level| i64::from(level.value()) >= threshold)
            .unwrap_or(LogLevel::Silent)
    }

    /// Level name as written into log records.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Silent => "SILENT",
        }
    }
}

impl FromStr for LogLevel {
    type Err = WelderError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(threshold) = trimmed.parse::<i64>() {
            return Ok(LogLevel::from_threshold(threshold));
        }
        match trimmed.to_uppercase().as_str() {
            "VERBOSE" => Ok(LogLevel::Verbose),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            "SILENT" | "NONE" => Ok(LogLevel::Silent),
            _ => Err(WelderError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

/// Wire forms accepted for a level: the host sends integers, hand-written
/// config files tend to use names.
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Number(i64),
    Name(String),
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match LevelRepr::deserialize(deserializer)? {
            LevelRepr::Number(threshold) => Ok(LogLevel::from_threshold(threshold)),
            LevelRepr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Verbose < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
        assert!(LogLevel::Critical < LogLevel::Silent);
    }

    #[test]
    fn test_from_threshold_exact_and_between() {
        assert_eq!(LogLevel::from_threshold(0), LogLevel::Verbose);
        assert_eq!(LogLevel::from_threshold(5), LogLevel::Verbose);
        assert_eq!(LogLevel::from_threshold(10), LogLevel::Debug);
        assert_eq!(LogLevel::from_threshold(15), LogLevel::Info);
        assert_eq!(LogLevel::from_threshold(40), LogLevel::Error);
        assert_eq!(LogLevel::from_threshold(51), LogLevel::Silent);
        assert_eq!(LogLevel::from_threshold(100), LogLevel::Silent);
        assert_eq!(LogLevel::from_threshold(-3), LogLevel::Verbose);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("verbose".parse::<LogLevel>().unwrap(), LogLevel::Verbose);
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("none".parse::<LogLevel>().unwrap(), LogLevel::Silent);
        assert_eq!("20".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_serde_accepts_numbers_and_names() {
        let levels: Vec<LogLevel> = serde_json::from_str(r#"[10, "info", 40, "CRITICAL"]"#).unwrap();
        assert_eq!(
            levels,
            vec![LogLevel::Debug, LogLevel::Info, LogLevel::Error, LogLevel::Critical]
        );
        assert_eq!(serde_json::to_string(&LogLevel::Warning).unwrap(), "30");
    }

    proptest! {
        #[test]
        fn prop_threshold_admits_same_records(threshold in -10i64..80) {
            let rounded = LogLevel::from_threshold(threshold);
            for record in LogLevel::ALL.iter().filter(|l| **l != LogLevel::Silent) {
                let raw_passes = i64::from(record.value()) >= threshold;
                prop_assert_eq!(raw_passes, *record >= rounded);
            }
        }
    }
}
