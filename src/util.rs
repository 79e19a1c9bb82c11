//! Utility functions shared across modules.

use std::time::Duration;

/// Formats a `std::time::Duration` into a human-readable string using `humantime`.
#[inline]
pub fn format_duration(duration: Duration) -> String {
    humantime::format_duration(duration).to_string()
}

/// Converts fractional seconds from a frame clock into a `Duration`.
/// Negative and NaN values clamp to zero, overflowing ones to `Duration::MAX`.
pub fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        Duration::ZERO
    } else {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}
