//! Domain types for the fare finder.
//!
//! This module contains the validated model the search pipeline works on:
//! airport codes, dates and stay lengths, time windows, weekday sets, fare
//! records, and the criteria of one search. Types enforce their invariants
//! at construction time.

mod airport;
mod criteria;
mod dates;
mod error;
mod fare;
mod time;
mod weekday;

pub use airport::{Iata, InvalidIata, parse_code_list};
pub use criteria::{
    DestinationFilter, Passengers, SearchCriteria, SortKey, TripMode, TripSpec, ceiling_from_input,
};
pub use dates::{DateRange, StaySpec, add_days, sub_days};
pub use error::CriteriaError;
pub use fare::{FareLeg, FarePair};
pub use time::{TimeError, TimeWindow, format_display, parse_hhmm, parse_timestamp};
pub use weekday::{InvalidWeekday, WEEKDAY_NAMES, WeekdaySet, parse_weekday, weekday_name};
