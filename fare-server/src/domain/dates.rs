//! Date ranges and stay-length specifications.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::error::CriteriaError;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range; `start` must not be after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CriteriaError> {
        if start > end {
            return Err(CriteriaError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day.
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Number of days covered, counting both ends.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// How long a round trip stays at the destination, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StaySpec {
    /// Exactly this many days.
    Exact { days: u32 },
    /// Any length in `min..=max`.
    Range { min: u32, max: u32 },
}

impl StaySpec {
    pub fn exact(days: u32) -> Self {
        StaySpec::Exact { days }
    }

    /// A range of stay lengths; `min` must not exceed `max`.
    pub fn range(min: u32, max: u32) -> Result<Self, CriteriaError> {
        if min > max {
            return Err(CriteriaError::InvalidStay(format!("minimum {min} exceeds maximum {max}")));
        }
        Ok(StaySpec::Range { min, max })
    }

    /// Candidate stay lengths in ascending order.
    pub fn lengths(&self) -> RangeInclusive<u32> {
        match *self {
            StaySpec::Exact { days } => days..=days,
            StaySpec::Range { min, max } => min..=max,
        }
    }
}

impl fmt::Display for StaySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaySpec::Exact { days } => write!(f, "{days}"),
            StaySpec::Range { min, max } => write!(f, "{min}..{max}"),
        }
    }
}

/// Parses `"3"` as an exact stay and `"3..5"` or `"3-5"` as a range.
impl FromStr for StaySpec {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_days = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| CriteriaError::InvalidStay(format!("{s:?} is not a day count")))
        };

        let s = s.trim();
        let split = s.split_once("..").or_else(|| s.split_once('-'));
        match split {
            Some((min, max)) => StaySpec::range(parse_days(min)?, parse_days(max)?),
            None => Ok(StaySpec::exact(parse_days(s)?)),
        }
    }
}

/// `day + n` days, saturating at the calendar's end.
pub fn add_days(day: NaiveDate, n: u32) -> NaiveDate {
    day.checked_add_days(Days::new(u64::from(n)))
        .unwrap_or(NaiveDate::MAX)
}

/// `day - n` days, or `None` before the calendar's start.
pub fn sub_days(day: NaiveDate, n: u32) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(u64::from(n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn range_validation() {
        assert!(DateRange::new(d(10, 1), d(10, 10)).is_ok());
        assert!(DateRange::new(d(10, 1), d(10, 1)).is_ok());
        assert!(matches!(
            DateRange::new(d(10, 2), d(10, 1)),
            Err(CriteriaError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn range_contains_and_len() {
        let r = DateRange::new(d(10, 1), d(10, 10)).unwrap();
        assert!(r.contains(d(10, 1)));
        assert!(r.contains(d(10, 10)));
        assert!(!r.contains(d(10, 11)));
        assert_eq!(r.len_days(), 10);
        assert_eq!(DateRange::single(d(10, 3)).len_days(), 1);
        assert_eq!(r.to_string(), "2025-10-01..2025-10-10");
    }

    #[test]
    fn stay_lengths() {
        assert_eq!(StaySpec::exact(3).lengths().collect::<Vec<_>>(), vec![3]);
        assert_eq!(
            StaySpec::range(2, 4).unwrap().lengths().collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
        assert!(StaySpec::range(5, 4).is_err());
    }

    #[test]
    fn stay_parsing() {
        assert_eq!("3".parse::<StaySpec>().unwrap(), StaySpec::exact(3));
        assert_eq!(
            "3..5".parse::<StaySpec>().unwrap(),
            StaySpec::Range { min: 3, max: 5 }
        );
        assert_eq!(
            " 2 - 7 ".parse::<StaySpec>().unwrap(),
            StaySpec::Range { min: 2, max: 7 }
        );
        assert!("x".parse::<StaySpec>().is_err());
        assert!("5..3".parse::<StaySpec>().is_err());
    }

    #[test]
    fn day_arithmetic() {
        assert_eq!(add_days(d(10, 30), 3), d(11, 2));
        assert_eq!(sub_days(d(10, 10), 3), Some(d(10, 7)));
        assert_eq!(sub_days(NaiveDate::MIN, 1), None);
    }
}
