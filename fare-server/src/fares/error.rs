//! Fare source error types.

/// Errors from a fare source.
#[derive(Debug, thiserror::Error)]
pub enum FareError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by fare API")]
    RateLimited,

    /// The source cannot price for a passenger party
    #[error("fare source does not accept passenger counts")]
    PassengersUnsupported,

    /// Feature not configured or not available
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Mock data directory could not be loaded
    #[error("mock fare data: {0}")]
    MockData(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}
