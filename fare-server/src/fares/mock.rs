//! Mock fare source for running without API access.
//!
//! Loads sample fare responses from JSON files and answers queries from
//! the legs they contain, as if they were live API responses.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{DateRange, FareLeg, FarePair, Iata, Passengers};
use crate::pipeline::{FareSource, FareSourceFactory};

use super::convert::convert_leg;
use super::error::FareError;
use super::types::FaresResponse;

/// Currency assumed for legs whose price carries none.
const MOCK_CURRENCY: &str = "EUR";

/// Mock fare source that serves data from JSON files.
///
/// Every leg of every fare in the files joins one pool. One-way queries
/// filter the pool by origin and departure date; round-trip queries pair
/// each matching outbound leg with legs flying back to the origin.
#[derive(Debug, Clone)]
pub struct MockFareSource {
    legs: Arc<Vec<FareLeg>>,
}

impl MockFareSource {
    /// Load every `*.json` file in `data_dir`.
    ///
    /// Each file holds a fare API response (`{"fares": [...]}`).
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self, FareError> {
        let data_dir = data_dir.as_ref();
        let mut legs = Vec::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            FareError::MockData(format!("failed to read {}: {e}", data_dir.display()))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| FareError::MockData(format!("failed to read directory entry: {e}")))?
                .path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let json = std::fs::read_to_string(&path).map_err(|e| {
                FareError::MockData(format!("failed to read {}: {e}", path.display()))
            })?;
            let response: FaresResponse = serde_json::from_str(&json).map_err(|e| {
                FareError::MockData(format!("failed to parse {}: {e}", path.display()))
            })?;

            for fare in &response.fares {
                for dto in std::iter::once(&fare.outbound).chain(fare.inbound.as_ref()) {
                    match convert_leg(dto, MOCK_CURRENCY) {
                        Ok(leg) => legs.push(leg),
                        Err(e) => warn!(
                            error = %e,
                            file = %path.display(),
                            "skipping mock leg with invalid airport code"
                        ),
                    }
                }
            }
        }

        if legs.is_empty() {
            return Err(FareError::MockData(format!(
                "no mock fares found in {}",
                data_dir.display()
            )));
        }

        info!(legs = legs.len(), dir = %data_dir.display(), "loaded mock fares");
        Ok(Self::from_legs(legs))
    }

    /// Build a source from legs already in memory.
    pub fn from_legs(legs: Vec<FareLeg>) -> Self {
        Self {
            legs: Arc::new(legs),
        }
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    fn departing(&self, origin: Iata, dates: DateRange) -> impl Iterator<Item = &FareLeg> {
        self.legs.iter().filter(move |leg| {
            leg.origin == origin && leg.departure.is_some_and(|d| dates.contains(d.date()))
        })
    }
}

impl FareSource for MockFareSource {
    async fn fetch_one_way(
        &self,
        origin: &Iata,
        dates: DateRange,
    ) -> Result<Vec<FareLeg>, FareError> {
        Ok(self.departing(*origin, dates).cloned().collect())
    }

    async fn fetch_round_trip(
        &self,
        origin: &Iata,
        outbound: DateRange,
        inbound: DateRange,
    ) -> Result<Vec<FarePair>, FareError> {
        let mut pairs = Vec::new();

        for out in self.departing(*origin, outbound) {
            let returns = self.departing(out.destination, inbound).filter(|back| {
                back.destination == *origin
                    && match (out.arrival, back.departure) {
                        (Some(arrive), Some(leave)) => leave >= arrive,
                        _ => true,
                    }
            });
            pairs.extend(returns.map(|back| FarePair::new(out.clone(), back.clone())));
        }

        Ok(pairs)
    }
}

impl FareSourceFactory for MockFareSource {
    type Source = MockFareSource;

    fn supports_passenger_counts(&self) -> bool {
        false
    }

    fn with_passengers(
        &self,
        _currency: &str,
        _passengers: Passengers,
    ) -> Result<MockFareSource, FareError> {
        Err(FareError::PassengersUnsupported)
    }

    fn currency_only(&self, _currency: &str) -> Result<MockFareSource, FareError> {
        Ok(self.clone())
    }
}
