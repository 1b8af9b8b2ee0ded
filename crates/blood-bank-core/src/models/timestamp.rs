//! Tolerant timestamp parsing for stored date strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a stored date string.
///
/// Accepts RFC 3339, SQLite's `datetime('now')` shape (`YYYY-MM-DD HH:MM:SS`)
/// and bare dates (midnight UTC). Anything else yields `None`.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
