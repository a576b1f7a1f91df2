//
//  bitbucket-mcp
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Utility Module
//!
//! Small helpers used by the formatters.
//!
//! ## Categories
//!
//! - **Time Utilities**: [`parse_timestamp`], [`format_date`], [`format_relative_time`]
//! - **String Utilities**: [`truncate`]
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_mcp::util::{format_date, truncate};
//!
//! assert_eq!(
//!     format_date(Some("2024-03-01T10:15:30.123456+00:00")),
//!     "2024-03-01 10:15:30 UTC"
//! );
//! assert_eq!(truncate("abcdef", 3), "abc...");
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parses an ISO 8601 / RFC 3339 timestamp into UTC.
///
/// Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// # Returns
///
/// - `"Not available"` for `None` or an empty string
/// - `"Invalid date"` when the value cannot be parsed
pub fn format_date(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => "Not available".to_string(),
        Some(v) => match parse_timestamp(v) {
            Some(dt) => format_utc(&dt),
            None => "Invalid date".to_string(),
        },
    }
}

/// Formats a UTC instant as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Describes how long ago `value` was, relative to `now`.
///
/// ```rust
/// use bitbucket_mcp::util::{format_relative_time, parse_timestamp};
///
/// let now = parse_timestamp("2024-03-03T00:00:00Z").unwrap();
/// assert_eq!(format_relative_time(Some("2024-03-01T00:00:00Z"), now), "2 days ago");
/// ```
pub fn format_relative_time(value: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return "Not available".to_string();
    };
    let Some(then) = parse_timestamp(value) else {
        return "Invalid date".to_string();
    };

    let secs = (now - then).num_seconds().max(0);
    let mins = secs / 60;
    let hours = mins / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = months / 12;

    let (n, unit) = if years > 0 {
        (years, "year")
    } else if months > 0 {
        (months, "month")
    } else if days > 0 {
        (days, "day")
    } else if hours > 0 {
        (hours, "hour")
    } else if mins > 0 {
        (mins, "minute")
    } else {
        (secs, "second")
    };
    format!("{} {}{} ago", n, unit, if n == 1 { "" } else { "s" })
}

/// Truncates to at most `max_chars` characters, appending `...` when cut.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
