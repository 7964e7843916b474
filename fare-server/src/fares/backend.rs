//! Runtime choice between the live API and mock data.

use crate::domain::{DateRange, FareLeg, FarePair, Iata, Passengers};
use crate::pipeline::{FareSource, FareSourceFactory};

use super::client::{FareClient, FareClientConfig, FareClientFactory};
use super::error::FareError;
use super::mock::MockFareSource;

/// Where fares come from.
#[derive(Debug, Clone)]
pub enum FareBackend {
    Live(FareClientFactory),
    Mock(MockFareSource),
}

impl FareBackend {
    /// Mock data when `mock_dir` is set, otherwise the live API.
    pub fn from_options(
        mock_dir: Option<&std::path::Path>,
        config: FareClientConfig,
    ) -> Result<Self, FareError> {
        match mock_dir {
            Some(dir) => Ok(FareBackend::Mock(MockFareSource::load(dir)?)),
            None => Ok(FareBackend::Live(FareClientFactory::new(config)?)),
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, FareBackend::Mock(_))
    }
}

/// A connected source from either backend.
#[derive(Debug, Clone)]
pub enum BackendSource {
    Live(FareClient),
    Mock(MockFareSource),
}

impl FareSource for BackendSource {
    async fn fetch_one_way(
        &self,
        origin: &Iata,
        dates: DateRange,
    ) -> Result<Vec<FareLeg>, FareError> {
        match self {
            BackendSource::Live(client) => client.fetch_one_way(origin, dates).await,
            BackendSource::Mock(mock) => mock.fetch_one_way(origin, dates).await,
        }
    }

    async fn fetch_round_trip(
        &self,
        origin: &Iata,
        outbound: DateRange,
        inbound: DateRange,
    ) -> Result<Vec<FarePair>, FareError> {
        match self {
            BackendSource::Live(client) => client.fetch_round_trip(origin, outbound, inbound).await,
            BackendSource::Mock(mock) => mock.fetch_round_trip(origin, outbound, inbound).await,
        }
    }
}

impl FareSourceFactory for FareBackend {
    type Source = BackendSource;

    fn supports_passenger_counts(&self) -> bool {
        match self {
            FareBackend::Live(factory) => factory.supports_passenger_counts(),
            FareBackend::Mock(mock) => mock.supports_passenger_counts(),
        }
    }

    fn with_passengers(
        &self,
        currency: &str,
        passengers: Passengers,
    ) -> Result<BackendSource, FareError> {
        match self {
            FareBackend::Live(factory) => factory
                .with_passengers(currency, passengers)
                .map(BackendSource::Live),
            FareBackend::Mock(mock) => mock
                .with_passengers(currency, passengers)
                .map(BackendSource::Mock),
        }
    }

    fn currency_only(&self, currency: &str) -> Result<BackendSource, FareError> {
        match self {
            FareBackend::Live(factory) => factory.currency_only(currency).map(BackendSource::Live),
            FareBackend::Mock(mock) => mock.currency_only(currency).map(BackendSource::Mock),
        }
    }
}
