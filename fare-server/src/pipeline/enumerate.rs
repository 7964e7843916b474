//! Duration-mode itinerary enumeration.
//!
//! A duration search asks for round trips of an exact stay length. Rather
//! than asking the fare source for wide windows and filtering afterwards,
//! the enumerator walks the departure window and asks for single-day
//! outbound and inbound windows, one query per (origin, stay, day).

use std::ops::RangeInclusive;

use chrono::{Days, NaiveDate};
use tracing::{debug, trace};

use crate::domain::{DateRange, FarePair, Iata, StaySpec, add_days, sub_days};

use super::search::SearchError;
use super::source::FareSource;

/// One planned round-trip query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub origin: Iata,
    pub stay_days: u32,
    pub outbound: NaiveDate,
    pub inbound: NaiveDate,
}

impl QueryWindow {
    pub fn outbound_range(&self) -> DateRange {
        DateRange::single(self.outbound)
    }

    pub fn inbound_range(&self) -> DateRange {
        DateRange::single(self.inbound)
    }
}

/// Stay lengths that fit inside `window`, in ascending order.
///
/// A stay longer than the window's span leaves no departure day, so the
/// upper bound is clamped to the span. Empty when even the shortest stay
/// does not fit.
fn fitting_stays(stay: StaySpec, window: DateRange) -> RangeInclusive<u32> {
    let span = u32::try_from(window.len_days() - 1).unwrap_or(u32::MAX);
    let lengths = stay.lengths();
    *lengths.start()..=(*lengths.end()).min(span)
}

/// Number of queries [`plan_queries`] would issue, computed without
/// building the plan.
///
/// For a stay `d` over a window spanning `span` days there are
/// `(span - d) / step + 1` departure days. The sum over all fitting stays
/// is taken in closed form, so the cost does not depend on the size of
/// the window or of the stay range.
pub fn count_queries(origins: usize, stay: StaySpec, window: DateRange, step_days: u32) -> u64 {
    let stays = fitting_stays(stay, window);
    if stays.is_empty() {
        return 0;
    }

    let span = u128::try_from(window.len_days() - 1).unwrap_or(0);
    let step = u128::from(step_days.max(1));

    // Sum of `k / step + 1` for k in `span - max ..= span - min`.
    let lo = span - u128::from(*stays.end());
    let hi = span - u128::from(*stays.start());
    let floor_sum = |n: u128| {
        let q = (n + 1) / step;
        let r = (n + 1) % step;
        step * q * q.saturating_sub(1) / 2 + r * q
    };
    let below = if lo == 0 { 0 } else { floor_sum(lo - 1) };
    let per_origin = floor_sum(hi) - below + (hi - lo + 1);

    u64::try_from(per_origin * origins as u128).unwrap_or(u64::MAX)
}

/// Plan every query of a duration search, in issue order.
///
/// Origins are the outer loop, stay lengths the middle, departure days the
/// inner. For stay `d` the last departure is `window.end - d`; a window too
/// short for `d` contributes no queries. Callers bound the plan with
/// [`count_queries`] first.
pub fn plan_queries(
    origins: &[Iata],
    stay: StaySpec,
    window: DateRange,
    step_days: u32,
) -> Vec<QueryWindow> {
    let step = Days::new(u64::from(step_days.max(1)));
    let mut plan = Vec::new();

    for origin in origins {
        for stay_days in fitting_stays(stay, window) {
            let Some(last_departure) = sub_days(window.end(), stay_days) else {
                continue;
            };

            let mut current = window.start();
            while current <= last_departure {
                plan.push(QueryWindow {
                    origin: *origin,
                    stay_days,
                    outbound: current,
                    inbound: add_days(current, stay_days),
                });
                match current.checked_add_days(step) {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }
    }

    plan
}

/// Whether a pair departs exactly `stay_days` apart.
///
/// Pairs missing either departure timestamp never qualify.
pub fn has_stay_length(pair: &FarePair, stay_days: u32) -> bool {
    pair.stay_days() == Some(i64::from(stay_days))
}

/// Issue the planned queries one after another and keep the pairs that
/// match their window's stay length.
///
/// The first failing query aborts the whole enumeration.
pub async fn collect_pairs<S: FareSource>(
    source: &S,
    plan: &[QueryWindow],
) -> Result<Vec<FarePair>, SearchError> {
    let mut pairs = Vec::new();

    for window in plan {
        trace!(
            origin = %window.origin,
            stay = window.stay_days,
            outbound = %window.outbound,
            inbound = %window.inbound,
            "querying round trips"
        );

        let fetched = source
            .fetch_round_trip(
                &window.origin,
                window.outbound_range(),
                window.inbound_range(),
            )
            .await
            .map_err(|source| SearchError::Fetch {
                origin: window.origin,
                source,
            })?;

        let returned = fetched.len();
        let before = pairs.len();
        pairs.extend(
            fetched
                .into_iter()
                .filter(|pair| has_stay_length(pair, window.stay_days)),
        );

        let kept = pairs.len() - before;
        if kept < returned {
            debug!(
                origin = %window.origin,
                outbound = %window.outbound,
                discarded = returned - kept,
                "dropped pairs outside the requested stay length"
            );
        }
    }

    Ok(pairs)
}
