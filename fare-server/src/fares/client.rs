//! HTTP client for a JSON fare API.
//!
//! Talks to a farfnd-style service exposing `oneWayFares` and
//! `roundTripFares`. Each call answers one origin over one date window and
//! returns the cheapest fare per route and day.

use std::time::Duration;

use tracing::{debug, trace};

use crate::domain::{DateRange, FareLeg, FarePair, Iata, Passengers};
use crate::pipeline::{FareSource, FareSourceFactory};

use super::convert::{convert_one_way, convert_round_trips};
use super::error::FareError;
use super::types::FaresResponse;

/// Default base URL for the fare API.
pub const DEFAULT_BASE_URL: &str = "https://services-api.ryanair.com/farfnd/v4";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Configuration for the fare client.
#[derive(Debug, Clone)]
pub struct FareClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Whether the API accepts passenger counts
    pub passenger_counts: bool,
}

impl FareClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Declare whether the API prices for passenger parties.
    pub fn with_passenger_counts(mut self, enabled: bool) -> Self {
        self.passenger_counts = enabled;
        self
    }
}

impl Default for FareClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            passenger_counts: true,
        }
    }
}

/// Builds [`FareClient`]s sharing one connection pool.
#[derive(Debug, Clone)]
pub struct FareClientFactory {
    http: reqwest::Client,
    base_url: String,
    passenger_counts: bool,
}

impl FareClientFactory {
    pub fn new(config: FareClientConfig) -> Result<Self, FareError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            passenger_counts: config.passenger_counts,
        })
    }

    fn client(&self, currency: &str, passengers: Option<Passengers>) -> FareClient {
        FareClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            currency: currency.to_string(),
            passengers,
        }
    }
}

impl FareSourceFactory for FareClientFactory {
    type Source = FareClient;

    fn supports_passenger_counts(&self) -> bool {
        self.passenger_counts
    }

    fn with_passengers(
        &self,
        currency: &str,
        passengers: Passengers,
    ) -> Result<FareClient, FareError> {
        if !self.passenger_counts {
            return Err(FareError::PassengersUnsupported);
        }
        Ok(self.client(currency, Some(passengers)))
    }

    fn currency_only(&self, currency: &str) -> Result<FareClient, FareError> {
        Ok(self.client(currency, None))
    }
}

/// Fare API client bound to one currency and, optionally, one party.
#[derive(Debug, Clone)]
pub struct FareClient {
    http: reqwest::Client,
    base_url: String,
    currency: String,
    passengers: Option<Passengers>,
}

impl FareClient {
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn passengers(&self) -> Option<Passengers> {
        self.passengers
    }

    /// Query parameters for one request.
    fn query_params(
        &self,
        origin: &Iata,
        outbound: DateRange,
        inbound: Option<DateRange>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("departureAirportIataCode", origin.to_string()),
            (
                "outboundDepartureDateFrom",
                outbound.start().format(DATE_FORMAT).to_string(),
            ),
            (
                "outboundDepartureDateTo",
                outbound.end().format(DATE_FORMAT).to_string(),
            ),
        ];

        if let Some(inbound) = inbound {
            params.push((
                "inboundDepartureDateFrom",
                inbound.start().format(DATE_FORMAT).to_string(),
            ));
            params.push((
                "inboundDepartureDateTo",
                inbound.end().format(DATE_FORMAT).to_string(),
            ));
        }

        params.push(("currency", self.currency.clone()));

        if let Some(passengers) = self.passengers {
            params.push(("adultPaxCount", passengers.adults().to_string()));
            params.push(("childPaxCount", passengers.children().to_string()));
        }

        params
    }

    async fn get(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<FaresResponse, FareError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        trace!(%url, ?params, "requesting fares");

        let response = self.http.get(&url).query(params).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FareError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FareError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FareError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl FareSource for FareClient {
    async fn fetch_one_way(
        &self,
        origin: &Iata,
        dates: DateRange,
    ) -> Result<Vec<FareLeg>, FareError> {
        let params = self.query_params(origin, dates, None);
        let response = self.get("oneWayFares", &params).await?;
        let legs = convert_one_way(&response, &self.currency);
        debug!(origin = %origin, %dates, fares = legs.len(), "fetched one-way fares");
        Ok(legs)
    }

    async fn fetch_round_trip(
        &self,
        origin: &Iata,
        outbound: DateRange,
        inbound: DateRange,
    ) -> Result<Vec<FarePair>, FareError> {
        let params = self.query_params(origin, outbound, Some(inbound));
        let response = self.get("roundTripFares", &params).await?;
        let pairs = convert_round_trips(&response, &self.currency);
        debug!(origin = %origin, %outbound, %inbound, fares = pairs.len(), "fetched round trips");
        Ok(pairs)
    }
}
