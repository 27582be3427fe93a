//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for message times, note edits, score submissions, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Rebuild a timestamp from milliseconds since the Unix epoch.
///
/// Out-of-range values clamp to the epoch.
#[must_use]
pub fn from_millis(millis: i64) -> Timestamp {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

/// Whole days elapsed since the Unix epoch at `ts`.
#[must_use]
pub fn days_since_epoch(ts: Timestamp) -> i64 {
    ts.timestamp().div_euclid(86_400)
}
