//! Domain error types.
//!
//! These errors represent invalid search criteria. They are raised before
//! any fare query is issued and are meant to be shown to the user as-is.

use chrono::NaiveDate;

use super::airport::InvalidIata;
use super::time::TimeError;
use super::weekday::InvalidWeekday;

/// Validation failures while building `SearchCriteria`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CriteriaError {
    /// No origin airport was given
    #[error("at least one origin airport is required")]
    NoOrigins,

    /// An airport code failed validation
    #[error(transparent)]
    InvalidCode(#[from] InvalidIata),

    /// Range start is after its end
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Stay-length specification is malformed
    #[error("invalid stay length: {0}")]
    InvalidStay(String),

    /// Duration-mode step must be at least one day
    #[error("step must be at least 1 day")]
    ZeroStep,

    /// Passenger counts are out of range
    #[error("invalid passengers: {0}")]
    InvalidPassengers(&'static str),

    /// Price ceiling is negative or not a number
    #[error("invalid price ceiling: {0}")]
    InvalidPrice(f64),

    #[error(transparent)]
    InvalidWeekday(#[from] InvalidWeekday),

    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    /// A date is not in YYYY-MM-DD form
    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// A numeric field is not a number
    #[error("invalid {field}: {value:?} is not a number")]
    InvalidNumber { field: &'static str, value: String },

    /// A required field for the chosen mode is missing
    #[error("missing {0}")]
    Missing(&'static str),

    /// Unknown value for an enumerated option
    #[error("unknown {field}: {value:?}")]
    UnknownOption { field: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            CriteriaError::NoOrigins.to_string(),
            "at least one origin airport is required"
        );

        let start = NaiveDate::from_ymd_opt(2025, 10, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        assert_eq!(
            CriteriaError::InvalidDateRange { start, end }.to_string(),
            "invalid date range: 2025-10-05 is after 2025-10-01"
        );

        assert_eq!(
            CriteriaError::ZeroStep.to_string(),
            "step must be at least 1 day"
        );

        let err = CriteriaError::UnknownOption {
            field: "sort key",
            value: "cheapest".into(),
        };
        assert_eq!(err.to_string(), "unknown sort key: \"cheapest\"");
    }
}
