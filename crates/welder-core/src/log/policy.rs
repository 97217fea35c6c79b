//! Per-child level policy applied on reconfiguration.

use welder_types::{LogLevel, LoggingSettings};

/// Strip the entry prefix from a known child's full name.
pub fn child_path<'a>(full_name: &'a str, entry_prefix: &str) -> &'a str {
    full_name.strip_prefix(entry_prefix).unwrap_or(full_name)
}

/// Level a known child ends up with after a reconfiguration.
///
/// Without settings every child gets `default_level`. With settings, a child
/// listed in `enabled_loggers` gets its listed level, unless its level before
/// the call was already quieter than `Error`; an unlisted child, or one in
/// that quiet state, is set to `Error`.
pub fn resolve_child_level(
    full_name: &str,
    current: Option<LogLevel>,
    settings: Option<&LoggingSettings>,
    default_level: LogLevel,
) -> LogLevel {
    let Some(settings) = settings else {
        return default_level;
    };

    let quieter_than_error = current.is_some_and(|level| level > LogLevel::Error);
    match settings.enabled_logger(full_name) {
        Some(enabled) if !quieter_than_error => enabled.log_level,
        _ => LogLevel::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("arc_welder.foo", "arc_welder."), "foo");
        assert_eq!(child_path("arc_welder.foo.bar", "arc_welder."), "foo.bar");
        assert_eq!(child_path("elsewhere.foo", "arc_welder."), "elsewhere.foo");
    }

    #[test]
    fn test_without_settings_uses_default() {
        assert_eq!(
            resolve_child_level("arc_welder.foo", Some(LogLevel::Critical), None, LogLevel::Debug),
            LogLevel::Debug
        );
    }

    #[test]
    fn test_listed_logger_gets_override() {
        let settings = LoggingSettings::default().with_enabled_logger("arc_welder.foo", LogLevel::Info);
        assert_eq!(
            resolve_child_level("arc_welder.foo", None, Some(&settings), LogLevel::Debug),
            LogLevel::Info
        );
        assert_eq!(
            resolve_child_level("arc_welder.foo", Some(LogLevel::Error), Some(&settings), LogLevel::Debug),
            LogLevel::Info
        );
    }

    #[test]
    fn test_unlisted_logger_is_error() {
        let settings = LoggingSettings::default().with_enabled_logger("arc_welder.foo", LogLevel::Info);
        assert_eq!(
            resolve_child_level("arc_welder.bar", Some(LogLevel::Verbose), Some(&settings), LogLevel::Debug),
            LogLevel::Error
        );
        assert_eq!(
            resolve_child_level("arc_welder.bar", None, Some(&LoggingSettings::default()), LogLevel::Debug),
            LogLevel::Error
        );
    }

    #[test]
    fn test_quiet_logger_is_pulled_back_to_error() {
        let settings = LoggingSettings::default().with_enabled_logger("arc_welder.foo", LogLevel::Verbose);
        assert_eq!(
            resolve_child_level("arc_welder.foo", Some(LogLevel::Critical), Some(&settings), LogLevel::Debug),
            LogLevel::Error
        );
        assert_eq!(
            resolve_child_level("arc_welder.foo", Some(LogLevel::Silent), Some(&settings), LogLevel::Debug),
            LogLevel::Error
        );
    }
}
