//! Relative timestamps.

use chrono::{DateTime, Utc};

/// Render how long before `now` the instant `t` was, in the largest whole
/// unit: `47s ago`, `3m ago`, `2h ago`, `5d ago`. Future instants render as
/// `0s ago`.
#[must_use]
pub fn ago(now: DateTime<Utc>, t: DateTime<Utc>) -> String {
    let secs = (now - t).num_seconds().max(0);
    let (value, unit) = match secs {
        s if s < 60 => (s, "s"),
        s if s < 60 * 60 => (s / 60, "m"),
        s if s < 24 * 60 * 60 => (s / (60 * 60), "h"),
        s => (s / (24 * 60 * 60), "d"),
    };
    format!("{value}{unit} ago")
}
