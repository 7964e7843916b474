//! Weekday names and allow-sets.
//!
//! Weekdays are displayed with a fixed table of Italian 3-letter names,
//! Monday first. Parsing also accepts English names so that command-line
//! users are not forced into one locale.

use std::fmt;

use chrono::Weekday;
use serde::{Serialize, Serializer};

/// Display names indexed by `Weekday::num_days_from_monday()`.
pub const WEEKDAY_NAMES: [&str; 7] = ["lun", "mar", "mer", "gio", "ven", "sab", "dom"];

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Error returned for an unrecognised weekday name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown weekday {0:?} (expected one of lun, mar, mer, gio, ven, sab, dom)"
)]
pub struct InvalidWeekday(pub String);

/// The display name for a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// Parse a weekday name from the display table, or an English name.
pub fn parse_weekday(name: &str) -> Result<Weekday, InvalidWeekday> {
    let trimmed = name.trim();
    let lower = trimmed.to_lowercase();

    if let Some(idx) = WEEKDAY_NAMES.iter().position(|n| *n == lower) {
        return Ok(ALL_WEEKDAYS[idx]);
    }

    lower
        .parse::<Weekday>()
        .map_err(|_| InvalidWeekday(trimmed.to_string()))
}

/// A set of weekdays, stored as a bitmask.
///
/// The empty set means "no restriction" wherever it is used as a filter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, weekday: Weekday) {
        self.0 |= 1 << weekday.num_days_from_monday();
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in Monday-first order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        ALL_WEEKDAYS.into_iter().filter(|d| self.contains(*d))
    }

    /// Parse a comma-separated list of weekday names.
    pub fn parse_list(csv: &str) -> Result<Self, InvalidWeekday> {
        csv.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_weekday)
            .collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Debug for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(weekday_name))
            .finish()
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(weekday_name).collect();
        f.write_str(&names.join(","))
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(weekday_name))
    }
}
