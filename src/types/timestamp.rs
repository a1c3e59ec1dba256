//! RFC 3339 timestamps as stored on entities.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// Parse a stored `created_at` value.
///
/// Only RFC 3339 is accepted; anything else is a data integrity problem for
/// the caller to report.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
}

/// Current time formatted the way entities store it, e.g. `2024-01-15T10:30:00Z`.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Format a UTC instant with second precision and a `Z` suffix.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
