//! The fare source seam.
//!
//! The pipeline never fetches fares itself. It talks to a [`FareSource`],
//! which is built through a [`FareSourceFactory`] so that sources which do
//! not understand passenger counts can still be used.

use tracing::debug;

use crate::domain::{DateRange, FareLeg, FarePair, Iata, Passengers};
use crate::fares::FareError;

/// Provider of raw fare records.
///
/// This abstraction allows the pipeline to be tested with mock data.
pub trait FareSource {
    /// One-way fares from `origin` departing within `dates`.
    fn fetch_one_way(
        &self,
        origin: &Iata,
        dates: DateRange,
    ) -> impl Future<Output = Result<Vec<FareLeg>, FareError>> + Send;

    /// Round trips from `origin` with the outbound leg departing within
    /// `outbound` and the inbound leg departing within `inbound`.
    fn fetch_round_trip(
        &self,
        origin: &Iata,
        outbound: DateRange,
        inbound: DateRange,
    ) -> impl Future<Output = Result<Vec<FarePair>, FareError>> + Send;
}

/// Two-tier constructor contract for fare sources.
pub trait FareSourceFactory {
    type Source: FareSource;

    /// Whether [`with_passengers`](Self::with_passengers) may succeed.
    fn supports_passenger_counts(&self) -> bool;

    /// Build a source that prices for the given party.
    fn with_passengers(
        &self,
        currency: &str,
        passengers: Passengers,
    ) -> Result<Self::Source, FareError>;

    /// Build a source that only knows the currency.
    fn currency_only(&self, currency: &str) -> Result<Self::Source, FareError>;
}

/// Build a fare source, preferring the passenger-aware constructor.
///
/// A rejected passenger-aware construction is not an error: it falls back
/// to the currency-only constructor, whose failure is the only one
/// returned.
pub fn connect<F: FareSourceFactory>(
    factory: &F,
    currency: &str,
    passengers: Passengers,
) -> Result<F::Source, FareError> {
    if factory.supports_passenger_counts() {
        match factory.with_passengers(currency, passengers) {
            Ok(source) => return Ok(source),
            Err(e) => debug!(error = %e, "passenger counts rejected, using currency only"),
        }
    }
    factory.currency_only(currency)
}
