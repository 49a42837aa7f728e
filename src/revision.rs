//! Revision history lines appended on every deployment.
//!
//! Each deployment adds one line `* <timestamp>: <reason>` to the content of
//! the workflow's "Revision History" sticky note.

use chrono::{DateTime, SecondsFormat, Utc};

/// Name of the sticky note carrying the revision history.
pub const REVISION_NOTE_NAME: &str = "Revision History";

/// Formats `timestamp` as RFC 3339 UTC with millisecond precision,
/// e.g. `2024-01-01T12:00:00.000Z`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn revision_entry(timestamp: &DateTime<Utc>, reason: &str) -> String {
    format!("* {}: {}", format_timestamp(timestamp), reason)
}

/// Content of the note after appending `entry`.
///
/// Empty or absent content is replaced by the entry alone.
pub fn append_entry(current: Option<&str>, entry: &str) -> String {
    match current {
        Some(content) if !content.is_empty() => format!("{}\n{}", content, entry),
        _ => entry.to_string(),
    }
}

/// Projected note content after deploying with `reason` at `timestamp`.
pub fn project(current: Option<&str>, reason: &str, timestamp: &DateTime<Utc>) -> String {
    append_entry(current, &revision_entry(timestamp, reason))
}
