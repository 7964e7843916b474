//! Search orchestration.
//!
//! Runs one search invocation end to end: fetch, filter, assemble, rank.
//! Fare queries are issued strictly one after another, origins first,
//! and every row is collected before ranking.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::SearchCache;
use crate::domain::{CriteriaError, DateRange, Iata, SearchCriteria, StaySpec, TripSpec};
use crate::fares::FareError;

use super::assemble::{ResultSet, assemble_one_way, assemble_round_trips};
use super::config::SearchConfig;
use super::enumerate::{collect_pairs, count_queries, plan_queries};
use super::predicates::{leg_matches, pair_matches};
use super::source::FareSource;

/// Error from a fare search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The criteria failed validation; nothing was queried
    #[error("invalid search: {0}")]
    InvalidCriteria(#[from] CriteriaError),

    /// A fare query failed; the search produced no results
    #[error("fare query from {origin} failed: {source}")]
    Fetch {
        origin: Iata,
        #[source]
        source: FareError,
    },

    /// A duration search would issue more queries than allowed
    #[error("search would issue {planned} fare queries, limit is {max}")]
    TooManyQueries { planned: u64, max: usize },
}

impl SearchError {
    /// Whether the error is the caller's fault rather than the source's.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidCriteria(_) | SearchError::TooManyQueries { .. }
        )
    }
}

/// Result of a fare search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Ranked and truncated rows.
    pub rows: Arc<ResultSet>,

    /// Number of fare source queries issued for this result.
    pub queries_issued: usize,

    /// Whether the rows came from the memoization cache.
    pub from_cache: bool,
}

/// Runs searches against a fare source.
pub struct Searcher<'a, S: FareSource> {
    source: &'a S,
    config: &'a SearchConfig,
    cache: Option<&'a SearchCache>,
}

impl<'a, S: FareSource> Searcher<'a, S> {
    /// Create a new searcher without memoization.
    pub fn new(source: &'a S, config: &'a SearchConfig) -> Self {
        Self {
            source,
            config,
            cache: None,
        }
    }

    /// Serve repeated criteria from `cache`.
    pub fn with_cache(mut self, cache: &'a SearchCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Run one search.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResult, SearchError> {
        if criteria.origins.is_empty() {
            return Err(CriteriaError::NoOrigins.into());
        }

        let key = criteria.cache_key();
        if let Some(cache) = self.cache
            && let Some(rows) = cache.get(&key).await
        {
            debug!(rows = rows.len(), "serving search from cache");
            return Ok(SearchResult {
                rows,
                queries_issued: 0,
                from_cache: true,
            });
        }

        info!(
            mode = %criteria.mode(),
            origins = criteria.origins.len(),
            "starting fare search"
        );

        let (rows, queries_issued) = match criteria.trip {
            TripSpec::OneWay { dates } => self.one_way(criteria, dates).await?,
            TripSpec::Return { outbound, inbound } => {
                self.round_trip(criteria, outbound, inbound).await?
            }
            TripSpec::Duration {
                window,
                stay,
                step_days,
            } => self.duration(criteria, window, stay, step_days).await?,
        };

        let rows = Arc::new(rows.rank(criteria.sort, criteria.limit));
        info!(
            rows = rows.len(),
            queries = queries_issued,
            "fare search finished"
        );

        if let Some(cache) = self.cache {
            cache.insert(key, rows.clone()).await;
        }

        Ok(SearchResult {
            rows,
            queries_issued,
            from_cache: false,
        })
    }

    async fn one_way(
        &self,
        criteria: &SearchCriteria,
        dates: DateRange,
    ) -> Result<(ResultSet, usize), SearchError> {
        let mut rows = Vec::new();

        for origin in &criteria.origins {
            let legs = self
                .source
                .fetch_one_way(origin, dates)
                .await
                .map_err(|source| SearchError::Fetch {
                    origin: *origin,
                    source,
                })?;

            let fetched = legs.len();
            let kept: Vec<_> = legs
                .iter()
                .filter(|leg| leg_matches(leg, criteria))
                .collect();
            debug!(origin = %origin, fetched, kept = kept.len(), "filtered one-way fares");

            rows.extend(assemble_one_way(kept));
        }

        Ok((ResultSet::OneWay(rows), criteria.origins.len()))
    }

    async fn round_trip(
        &self,
        criteria: &SearchCriteria,
        outbound: DateRange,
        inbound: DateRange,
    ) -> Result<(ResultSet, usize), SearchError> {
        let mut rows = Vec::new();

        for origin in &criteria.origins {
            let pairs = self
                .source
                .fetch_round_trip(origin, outbound, inbound)
                .await
                .map_err(|source| SearchError::Fetch {
                    origin: *origin,
                    source,
                })?;

            let fetched = pairs.len();
            let kept: Vec<_> = pairs
                .iter()
                .filter(|pair| pair_matches(pair, criteria))
                .collect();
            debug!(origin = %origin, fetched, kept = kept.len(), "filtered round trips");

            rows.extend(assemble_round_trips(kept, Some(criteria.passengers)));
        }

        Ok((ResultSet::RoundTrip(rows), criteria.origins.len()))
    }

    async fn duration(
        &self,
        criteria: &SearchCriteria,
        window: DateRange,
        stay: StaySpec,
        step_days: u32,
    ) -> Result<(ResultSet, usize), SearchError> {
        let planned = count_queries(criteria.origins.len(), stay, window, step_days);
        if planned > self.config.max_queries as u64 {
            return Err(SearchError::TooManyQueries {
                planned,
                max: self.config.max_queries,
            });
        }

        let plan = plan_queries(&criteria.origins, stay, window, step_days);
        debug!(queries = plan.len(), stay = %stay, "planned duration search");

        let pairs = collect_pairs(self.source, &plan).await?;
        let kept = pairs.iter().filter(|pair| pair_matches(pair, criteria));
        let rows = assemble_round_trips(kept, Some(criteria.passengers));

        Ok((ResultSet::RoundTrip(rows), plan.len()))
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
