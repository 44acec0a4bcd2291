//! Date/time utilities for CloudStore.
//!
//! Timestamps are stored as RFC3339 UTC strings throughout the database.

use chrono::{DateTime, Utc};

/// Current time as an RFC3339 UTC string.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Parse a stored RFC3339 timestamp back to a `DateTime<Utc>`.
///
/// Returns `None` if the string does not parse; stored timestamps are
/// treated as opaque when malformed rather than failing the operation.
pub fn parse_rfc3339(datetime_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(datetime_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
