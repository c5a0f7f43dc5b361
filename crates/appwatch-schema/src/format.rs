//! Display formatting shared by responses and notifications.

use chrono::{DateTime, SecondsFormat, Utc};

/// Bytes in one gigabyte (binary).
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Marker appended to text cut by [`truncate_chars`].
pub const ELLIPSIS: &str = "...";

/// Render a byte count as gigabytes with two decimals, e.g. `"1.50 GB"`.
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / BYTES_PER_GB)
}

/// ISO 8601 UTC timestamp with millisecond precision, e.g.
/// `"2024-01-01T00:00:00.000Z"`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert epoch seconds to a UTC timestamp. Out-of-range values yield `None`.
pub fn from_epoch_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Cut `text` to at most `limit` characters, ending with [`ELLIPSIS`] when
/// anything was removed. Limits too short for the marker get a bare cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    if limit <= ELLIPSIS.len() {
        return text.chars().take(limit).collect();
    }
    let keep = limit - ELLIPSIS.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
