//! Time utilities for signing operations

use chrono::prelude::*;

/// DateTime in UTC, the only flavor used across this workspace.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a [`DateTime`] of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Unix timestamp of now, in seconds.
///
/// The service expects this as the `ck` cache-buster query parameter.
pub fn unix_timestamp() -> i64 {
    now().timestamp()
}
