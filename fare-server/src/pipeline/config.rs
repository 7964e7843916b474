//! Search configuration for the fare pipeline.

/// Configuration parameters for fare searches.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of fare queries one duration search may plan.
    /// Larger plans are rejected before any query is issued.
    pub max_queries: usize,

    /// Step in days used when a duration search does not specify one.
    pub default_step_days: u32,

    /// Currency used when a search does not specify one.
    pub default_currency: String,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_queries: usize,
        default_step_days: u32,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            max_queries,
            default_step_days,
            default_currency: default_currency.into(),
        }
    }

    /// Set the query budget.
    pub fn with_max_queries(mut self, max_queries: usize) -> Self {
        self.max_queries = max_queries;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_queries: 500,
            default_step_days: 1,
            default_currency: "EUR".to_string(),
        }
    }
}
