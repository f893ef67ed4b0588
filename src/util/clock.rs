//! Wall-clock helpers.

use std::time::{SystemTime, UNIX_EPOCH};

use super::serde::TimestampMs;

/// Milliseconds per minute.
pub const MINUTE_MS: TimestampMs = 60 * 1000;

/// Milliseconds per hour.
pub const HOUR_MS: TimestampMs = 60 * MINUTE_MS;

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// A clock set before the epoch reads as `0`.
pub fn now_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
