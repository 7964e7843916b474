//! Airport directory.
//!
//! Maps IATA codes to city, airport name and country for picker labels
//! and the airport search endpoint. Loaded from a CSV file at startup,
//! with a small built-in table when the file is missing or unreadable.

mod directory;
mod error;

pub use directory::{Airport, AirportDirectory};
pub use error::AirportError;
