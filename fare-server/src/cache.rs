//! Memoization of search results.
//!
//! Identical criteria within the TTL are answered from memory without
//! contacting the fare source. The key is the canonical serialization of
//! the criteria, so any differing field is a different entry.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::pipeline::ResultSet;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 256,
        }
    }
}

/// Cache of ranked search results keyed by criteria.
#[derive(Clone)]
pub struct SearchCache {
    results: MokaCache<String, Arc<ResultSet>>,
}

impl SearchCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let results = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { results }
    }

    /// Get a cached result set.
    pub async fn get(&self, key: &str) -> Option<Arc<ResultSet>> {
        self.results.get(key).await
    }

    /// Insert a result set into the cache.
    pub async fn insert(&self, key: String, rows: Arc<ResultSet>) {
        self.results.insert(key, rows).await;
    }
}
