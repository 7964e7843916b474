//! Fare API client and mock data source.
//!
//! This module provides an HTTP client for a JSON fare-finder API, which
//! returns the cheapest fare per route and day for one origin.
//!
//! Key characteristics of the API:
//! - One request covers one origin and one departure date window
//! - Prices, stop counts and segment lists may be missing or malformed
//! - Passenger counts are accepted by some deployments only

mod backend;
mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use backend::{BackendSource, FareBackend};
pub use client::{DEFAULT_BASE_URL, FareClient, FareClientConfig, FareClientFactory};
pub use convert::{convert_leg, convert_one_way, convert_round_trips};
pub use error::FareError;
pub use mock::MockFareSource;
pub use types::{AirportDto, FareDto, FaresResponse, LegDto, PriceDto, SegmentDto, SummaryDto};
