//! Time utilities for log records and rotation.

use chrono::{DateTime, Duration, Local, Timelike};

/// Length of one rotation period.
pub fn rotation_interval() -> Duration {
    Duration::days(1)
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS,mmm`.
pub fn format_log_time(timestamp: DateTime<Local>) -> String {
    let millis = timestamp.nanosecond() / 1_000_000 % 1000;
    format!("{},{:03}", timestamp.format("%Y-%m-%d %H:%M:%S"), millis)
}

/// Suffix appended to a rotated log file for the period starting at `period_start`.
pub fn backup_suffix(period_start: DateTime<Local>) -> String {
    period_start.format("%Y-%m-%d").to_string()
}

/// First rollover instant strictly after `now` for a period that started at `start`.
pub fn next_rollover(start: DateTime<Local>, now: DateTime<Local>) -> DateTime<Local> {
    let interval = rotation_interval();
    let mut at = start + interval;
    while at <= now {
        at += interval;
    }
    at
}
