//! # Date Handling Utilities
//!
//! Formatting for the timestamps shown in execution tables and embedded in
//! backup file names.

use chrono::{DateTime, Local, TimeZone};

/// Format used when printing execution start times.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format embedded in backup file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Format an ISO-8601 timestamp for table display.
///
/// Unparseable input falls back to its first 19 characters, which is the
/// `YYYY-MM-DDTHH:MM:SS` prefix for most near-ISO strings.
///
/// # Example
/// ```rust
/// use n8nctl_util::date_handling::format_display_timestamp;
///
/// assert_eq!(format_display_timestamp("2024-05-01T10:00:00.000Z"), "2024-05-01 10:00:00");
/// assert_eq!(format_display_timestamp("2024-05-01 10:00:00 extra"), "2024-05-01 10:00:00");
/// ```
pub fn format_display_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
        Err(_) => raw.chars().take(19).collect(),
    }
}

/// Format a run time in seconds with one decimal place.
///
/// ```rust
/// use n8nctl_util::date_handling::format_duration_seconds;
///
/// assert_eq!(format_duration_seconds(2.5), "2.5s");
/// assert_eq!(format_duration_seconds(0.04), "0.0s");
/// ```
pub fn format_duration_seconds(seconds: f64) -> String {
    format!("{seconds:.1}s")
}

/// Timestamp token for file names, rendered in the given timezone.
pub fn file_timestamp<Tz>(moment: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    moment.format(FILE_TIMESTAMP_FORMAT).to_string()
}

/// Timestamp token for file names at the current local time.
pub fn local_file_timestamp() -> String {
    file_timestamp(&Local::now())
}
