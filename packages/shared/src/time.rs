//! Time-related utilities with clock abstraction for testability.
//!
//! The backend serializes timestamps as RFC 3339 strings (UTC or with an
//! offset). The client only needs to parse them for display.

use chrono::{DateTime, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in UTC (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        now_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp in UTC (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a server timestamp (RFC 3339) into UTC.
///
/// Returns `None` for anything that is not a valid RFC 3339 string.
pub fn parse_server_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Convert Unix timestamp (milliseconds) to a `HH:MM:SS` UTC clock string.
pub fn millis_to_clock(timestamp_millis: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_millis).single() {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Format a server timestamp for table display (`YYYY-MM-DD HH:MM`).
///
/// Unparseable values are shown as-is; missing values as `-`.
pub fn format_server_timestamp(value: Option<&str>) -> String {
    match value {
        None => "-".to_string(),
        Some(raw) => match parse_server_timestamp(raw) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => raw.to_string(),
        },
    }
}

/// Describe how long ago a server timestamp was, relative to `now_millis`.
pub fn format_relative(value: &str, now_millis: i64) -> String {
    let Some(dt) = parse_server_timestamp(value) else {
        return value.to_string();
    };

    let elapsed_secs = (now_millis - dt.timestamp_millis()).max(0) / 1000;
    match elapsed_secs {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{} min ago", elapsed_secs / 60),
        3600..=86_399 => format!("{} h ago", elapsed_secs / 3600),
        _ => format!("{} d ago", elapsed_secs / 86_400),
    }
}
