//! Fare search pipeline.
//!
//! Turns search criteria into ranked result rows. Fares are fetched from a
//! [`FareSource`] one query at a time, filtered by the predicates, shaped
//! into rows and ranked.

mod assemble;
mod config;
mod enumerate;
mod predicates;
mod rank;
mod search;
mod source;

pub use assemble::{
    OneWayRow, ResultSet, RoundTripRow, TabularRow, assemble_one_way, assemble_round_trips,
    group_total,
};
pub use config::SearchConfig;
pub use enumerate::{QueryWindow, collect_pairs, count_queries, has_stay_length, plan_queries};
pub use predicates::{
    Directness, DirectnessSignals, destination_allowed, is_direct, leg_matches, matches_destination,
    matches_price, matches_weekday, pair_matches, pair_passes_direct_filter, passes_direct_filter,
    within_time_window,
};
pub use rank::{Rankable, apply_limit, rank_rows, sort_rows};
pub use search::{SearchError, SearchResult, Searcher};
pub use source::{FareSource, FareSourceFactory, connect};
