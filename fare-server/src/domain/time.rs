//! Time handling for fare filters and display.
//!
//! Fare timestamps are local to the airport they refer to and carry no
//! offset, so everything here works on `NaiveDateTime` and `NaiveTime`.
//! Time-of-day filters deliberately ignore the date component.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

use super::weekday::weekday_name;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a time of day from "HH:MM" format.
///
/// # Examples
///
/// ```
/// use fare_server::domain::parse_hhmm;
///
/// assert!(parse_hhmm("00:00").is_ok());
/// assert!(parse_hhmm("23:59").is_ok());
///
/// assert!(parse_hhmm("1430").is_err());
/// assert!(parse_hhmm("14:3").is_err());
/// assert!(parse_hhmm("25:00").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    let bytes = s.trim().as_bytes();

    if bytes.len() != 5 {
        return Err(TimeError::new("expected HH:MM format"));
    }

    if bytes[2] != b':' {
        return Err(TimeError::new("expected colon at position 2"));
    }

    let hour =
        parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    let minute =
        parse_two_digits(&bytes[3..5]).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
}

fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
            Some(u32::from(a - b'0') * 10 + u32::from(b - b'0'))
        }
        _ => None,
    }
}

/// Timestamp layouts the fare API has been seen to emit.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a fare timestamp. Returns `None` for anything unrecognised.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Format a timestamp for display as `"{wd} {DD}/{MM}/{YYYY} {HH}:{MM}"`.
///
/// Absent timestamps format to an empty string.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fare_server::domain::format_display;
///
/// let dt = NaiveDate::from_ymd_opt(2025, 10, 1)
///     .unwrap()
///     .and_hms_opt(6, 5, 0)
///     .unwrap();
/// assert_eq!(format_display(Some(dt)), "mer 01/10/2025 06:05");
/// assert_eq!(format_display(None), "");
/// ```
pub fn format_display(ts: Option<NaiveDateTime>) -> String {
    match ts {
        Some(dt) => format!(
            "{} {:02}/{:02}/{} {:02}:{:02}",
            weekday_name(dt.weekday()),
            dt.day(),
            dt.month(),
            dt.year(),
            dt.hour(),
            dt.minute()
        ),
        None => String::new(),
    }
}

/// An optional time-of-day interval with inclusive bounds.
///
/// Either bound may be absent; a window with neither bound accepts every
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TimeWindow {
    pub after: Option<NaiveTime>,
    pub before: Option<NaiveTime>,
}

impl TimeWindow {
    pub fn new(after: Option<NaiveTime>, before: Option<NaiveTime>) -> Self {
        Self { after, before }
    }

    /// A window that accepts every time of day.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }

    /// Whether `time` satisfies both present bounds.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.after.is_some_and(|after| time < after) {
            return false;
        }
        if self.before.is_some_and(|before| time > before) {
            return false;
        }
        true
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |t: Option<NaiveTime>| t.map(|t| t.format("%H:%M").to_string());
        match (bound(self.after), bound(self.before)) {
            (Some(a), Some(b)) => write!(f, "{a}-{b}"),
            (Some(a), None) => write!(f, ">={a}"),
            (None, Some(b)) => write!(f, "<={b}"),
            (None, None) => f.write_str("any"),
        }
    }
}
