//! Timestamp utilities for Sweepr
//!
//! Provides the timestamp formats used in marker and archive file names.

use chrono::{DateTime, TimeZone, Utc};

/// Convert epoch milliseconds to a UTC datetime.
///
/// Out-of-range values yield `None`.
pub fn from_epoch_ms(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Timestamp embedded in deletion marker names.
///
/// Format: `YYYY-mm-ddTHH-MM-SS.ffffffZ`
/// Example: `2026-10-18T09-15-02.004512Z`
pub fn marker_stamp(at: DateTime<Utc>) -> String {
    format!("{}Z", at.format("%Y-%m-%dT%H-%M-%S%.6f"))
}

/// Timestamp embedded in archive record names.
///
/// Format: `YYYYmmdd_HHMMSS_ffffff`
pub fn archive_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S_%6f").to_string()
}
