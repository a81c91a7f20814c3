//! Per-format timestamp conversions.
//!
//! Every conversion is a pure `raw -> Option<_>` function. Callers apply the
//! best-effort policy through [`or_empty`]: times are presentation data, so a
//! value that cannot be converted becomes an empty string (or a zero
//! duration) instead of failing the run.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Timelike};
use tracing::debug;

const XUNIT_FORMAT: &str = "%m/%d/%Y %H:%M:%S";
const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// TestNG: replace the trailing ` <zone>` token with a literal `Z`.
///
/// `2024-01-01 10:00:00 IST` becomes `2024-01-01 10:00:00Z`. No zone
/// conversion happens. A value without a trailing space-separated token is
/// returned unchanged.
pub fn testng(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let head = raw.trim_end_matches(|c: char| !c.is_whitespace());
    match head.strip_suffix(' ') {
        Some(stem) => Some(format!("{}Z", stem.trim_end_matches(' '))),
        None => Some(raw.to_string()),
    }
}

/// XUnit: `MM/DD/YYYY HH:MM:SS`.
pub fn xunit(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), XUNIT_FORMAT).ok()
}

/// NUnit: the run's own value with all whitespace removed.
pub fn nunit(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    (!compact.is_empty()).then_some(compact)
}

/// MSTest: ISO-8601 with an embedded offset. The offset is dropped, not
/// applied, so the wall-clock time is kept as-is. Fractional seconds are cut
/// off to match the emitted `...:SSZ` form.
pub fn mstest(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()?
        .with_nanosecond(0)
}

pub fn to_utc_string(at: NaiveDateTime) -> String {
    at.format(UTC_FORMAT).to_string()
}

/// `start + seconds`, or None if the duration is unusable.
pub fn plus_seconds(start: NaiveDateTime, seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let delta = TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)?;
    start.checked_add_signed(delta)
}

/// Absolute distance between two instants in seconds.
pub fn seconds_between(a: NaiveDateTime, b: NaiveDateTime) -> f64 {
    (b - a).num_milliseconds().abs() as f64 / 1000.0
}

/// Best-effort policy: a failed conversion becomes an empty string.
pub fn or_empty(value: Option<String>, field: &str, raw: Option<&str>) -> String {
    value.unwrap_or_else(|| {
        if let Some(raw) = raw {
            debug!(field, raw, "unrecognised timestamp, leaving it empty");
        }
        String::new()
    })
}
