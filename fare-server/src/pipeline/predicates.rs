//! Stateless filter predicates over fare records.
//!
//! Every predicate tolerates missing data. Structural absence (no
//! timestamp, no directness signal) never excludes a record; a price that
//! cannot be compared against a ceiling always does.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::domain::{
    DestinationFilter, FareLeg, FarePair, Iata, SearchCriteria, TimeWindow, WeekdaySet,
};

/// Whether a leg is non-stop, as far as the fare source lets us tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Directness {
    Direct,
    NotDirect,
    Unknown,
}

impl Directness {
    fn from_bool(direct: bool) -> Self {
        if direct {
            Directness::Direct
        } else {
            Directness::NotDirect
        }
    }
}

/// Optional signals a fare record may carry about its connections.
///
/// Fare sources populate at most one of these in practice, and often none.
pub trait DirectnessSignals {
    fn stop_count(&self) -> Option<i64>;
    fn direct_flag(&self) -> Option<bool>;
    fn segment_count(&self) -> Option<usize>;
}

impl DirectnessSignals for FareLeg {
    fn stop_count(&self) -> Option<i64> {
        self.stops
    }

    fn direct_flag(&self) -> Option<bool> {
        self.direct
    }

    fn segment_count(&self) -> Option<usize> {
        self.segments.as_ref().map(Vec::len)
    }
}

/// Classify directness, probing stop count, then the flag, then segments.
pub fn is_direct<T: DirectnessSignals + ?Sized>(record: &T) -> Directness {
    if let Some(stops) = record.stop_count() {
        return Directness::from_bool(stops == 0);
    }
    if let Some(direct) = record.direct_flag() {
        return Directness::from_bool(direct);
    }
    if let Some(segments) = record.segment_count() {
        return Directness::from_bool(segments <= 1);
    }
    Directness::Unknown
}

/// Direct-only filter for a single leg.
///
/// Records of unknown directness are kept: the fare source does not
/// reliably expose segment detail.
pub fn passes_direct_filter<T: DirectnessSignals + ?Sized>(record: &T, direct_only: bool) -> bool {
    !direct_only || is_direct(record) != Directness::NotDirect
}

/// Direct-only filter for a round trip: both legs must pass.
pub fn pair_passes_direct_filter(pair: &FarePair, direct_only: bool) -> bool {
    passes_direct_filter(&pair.outbound, direct_only)
        && passes_direct_filter(&pair.inbound, direct_only)
}

/// Weekday filter. An empty set or an absent timestamp passes.
pub fn matches_weekday(timestamp: Option<NaiveDateTime>, allowed: &WeekdaySet) -> bool {
    if allowed.is_empty() {
        return true;
    }
    match timestamp {
        Some(ts) => allowed.contains(ts.weekday()),
        None => true,
    }
}

/// Time-of-day filter with inclusive bounds. An absent timestamp passes.
pub fn within_time_window(timestamp: Option<NaiveDateTime>, window: &TimeWindow) -> bool {
    match timestamp {
        Some(ts) => window.contains(ts.time()),
        None => true,
    }
}

/// Price filter. With a ceiling set, an absent amount fails.
pub fn matches_price(amount: Option<f64>, ceiling: Option<f64>) -> bool {
    match ceiling {
        None => true,
        Some(max) => amount.is_some_and(|a| a.is_finite() && a <= max),
    }
}

/// Destination filter. A single override wins over the set.
pub fn matches_destination(code: &str, single: Option<&Iata>, set: &BTreeSet<Iata>) -> bool {
    match single {
        Some(only) => only.matches(code),
        None => set.is_empty() || set.iter().any(|c| c.matches(code)),
    }
}

/// Convenience over [`matches_destination`] for a criteria filter.
pub fn destination_allowed(code: &Iata, filter: &DestinationFilter) -> bool {
    matches_destination(code.as_str(), filter.single.as_ref(), &filter.set)
}

/// Full filter chain for a one-way leg.
pub fn leg_matches(leg: &FareLeg, criteria: &SearchCriteria) -> bool {
    destination_allowed(&leg.destination, &criteria.destinations)
        && passes_direct_filter(leg, criteria.direct_only)
        && matches_price(leg.price, criteria.price_ceiling)
        && matches_weekday(leg.departure, &criteria.weekdays)
        && within_time_window(leg.departure, &criteria.departure_window)
        && within_time_window(leg.arrival, &criteria.arrival_window)
}

/// Full filter chain for a round trip.
///
/// Destination, weekday and time windows look at the outbound leg; the
/// price ceiling applies to the combined fare; both legs must pass the
/// direct-only filter.
pub fn pair_matches(pair: &FarePair, criteria: &SearchCriteria) -> bool {
    let out = &pair.outbound;
    destination_allowed(&out.destination, &criteria.destinations)
        && pair_passes_direct_filter(pair, criteria.direct_only)
        && matches_price(pair.total_price, criteria.price_ceiling)
        && matches_weekday(out.departure, &criteria.weekdays)
        && within_time_window(out.departure, &criteria.departure_window)
        && within_time_window(out.arrival, &criteria.arrival_window)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{Duration, NaiveDate, Weekday};
    use proptest::prelude::*;

    const DAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    fn timestamp_strategy() -> impl Strategy<Value = NaiveDateTime> {
        (0i64..3650, 0i64..1440).prop_map(|(day, mins)| {
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                + Duration::days(day)
                + Duration::minutes(mins)
        })
    }

    fn weekday_set_strategy() -> impl Strategy<Value = WeekdaySet> {
        prop::collection::vec(0usize..7, 0..7)
            .prop_map(|idxs| idxs.into_iter().map(|i| DAYS[i]).collect())
    }

    proptest! {
        /// The empty set never restricts
        #[test]
        fn empty_weekday_set_passes(ts in timestamp_strategy()) {
            prop_assert!(matches_weekday(Some(ts), &WeekdaySet::new()));
        }

        /// A non-empty set passes exactly its members
        #[test]
        fn weekday_membership(ts in timestamp_strategy(), set in weekday_set_strategy()) {
            let expected = set.is_empty() || set.contains(ts.weekday());
            prop_assert_eq!(matches_weekday(Some(ts), &set), expected);
        }

        /// Legs without any directness signal are unknown and kept
        #[test]
        fn signal_free_legs_pass(direct_only in any::<bool>()) {
            let l = FareLeg::new(Iata::parse("BGY").unwrap(), Iata::parse("STN").unwrap(), "EUR");
            prop_assert_eq!(is_direct(&l), Directness::Unknown);
            prop_assert!(passes_direct_filter(&l, direct_only));
        }

        /// Price filter agrees with a plain comparison for numeric amounts
        #[test]
        fn price_matches_comparison(amount in 0.0f64..1000.0, ceiling in 0.0f64..1000.0) {
            prop_assert_eq!(matches_price(Some(amount), Some(ceiling)), amount <= ceiling);
        }
    }
}
