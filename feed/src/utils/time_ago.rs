//! Relative-age formatting for event timestamps.
//!
//! Elapsed time is bucketed into the largest whole unit:
//!
//! | Elapsed | Output |
//! |---------|--------|
//! | `< 60s` | `"{s}s ago"` |
//! | `< 1h` | `"{m}m ago"` |
//! | `< 1d` | `"{h}h ago"` |
//! | otherwise | `"{d}d ago"` |
//!
//! The current instant is always passed in by the caller.

use chrono::{DateTime, Utc};

use crate::render::RenderError;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// Formats the age of `timestamp` relative to `now`.
///
/// Timestamps later than `now` are clamped to `"0s ago"`.
///
/// # Errors
///
/// Returns [`RenderError::MalformedTimestamp`] if `timestamp` is not a valid
/// RFC 3339 / ISO-8601 date-time.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use gh_feed::utils::time_ago;
///
/// let now = Utc::now();
/// let ts = (now - Duration::seconds(90)).to_rfc3339();
/// assert_eq!(time_ago(&ts, now).unwrap(), "1m ago");
/// ```
pub fn time_ago(timestamp: &str, now: DateTime<Utc>) -> Result<String, RenderError> {
    let event_time = parse_utc(timestamp)?;
    let elapsed = (now - event_time).num_seconds().max(0);
    Ok(format_elapsed(elapsed))
}

/// Parses an ISO-8601 timestamp and normalizes it to UTC.
///
/// # Errors
///
/// Returns [`RenderError::MalformedTimestamp`] on any parse failure.
pub fn parse_utc(timestamp: &str) -> Result<DateTime<Utc>, RenderError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| RenderError::MalformedTimestamp {
            value: timestamp.to_string(),
            source,
        })
}

/// Formats a non-negative number of elapsed seconds.
#[must_use]
pub fn format_elapsed(secs: i64) -> String {
    if secs < SECS_PER_MINUTE {
        format!("{secs}s ago")
    } else if secs < SECS_PER_HOUR {
        format!("{}m ago", secs / SECS_PER_MINUTE)
    } else if secs < SECS_PER_DAY {
        format!("{}h ago", secs / SECS_PER_HOUR)
    } else {
        format!("{}d ago", secs / SECS_PER_DAY)
    }
}
