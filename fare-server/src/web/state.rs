//! Application state for the web layer.

use std::sync::Arc;

use crate::airports::AirportDirectory;
use crate::cache::{CacheConfig, SearchCache};
use crate::fares::FareBackend;
use crate::pipeline::SearchConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Where fares come from
    pub backend: Arc<FareBackend>,

    /// Memoized search results
    pub cache: Arc<SearchCache>,

    /// Search limits and defaults
    pub config: Arc<SearchConfig>,

    /// Airport labels and search
    pub airports: AirportDirectory,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        backend: FareBackend,
        cache_config: &CacheConfig,
        config: SearchConfig,
        airports: AirportDirectory,
    ) -> Self {
        Self {
            backend: Arc::new(backend),
            cache: Arc::new(SearchCache::new(cache_config)),
            config: Arc::new(config),
            airports,
        }
    }
}
