//! Fare records returned by a fare source.
//!
//! These are read-only to the search pipeline. Every field that the fare
//! source may omit is an `Option`; the pipeline decides per filter what an
//! absent value means.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::airport::Iata;

/// One flight segment as reported by the fare source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareLeg {
    pub origin: Iata,
    pub destination: Iata,
    pub departure: Option<NaiveDateTime>,
    pub arrival: Option<NaiveDateTime>,
    /// Fare per passenger. `None` when missing or not a finite number.
    pub price: Option<f64>,
    pub currency: String,
    pub flight_number: String,
    /// Number of intermediate stops, when the source reports it.
    pub stops: Option<i64>,
    /// Explicit non-stop flag, when the source reports it.
    pub direct: Option<bool>,
    /// Flight numbers of the individual segments, when the source reports them.
    pub segments: Option<Vec<String>>,
}

impl FareLeg {
    /// A leg with no optional data populated.
    pub fn new(origin: Iata, destination: Iata, currency: impl Into<String>) -> Self {
        Self {
            origin,
            destination,
            departure: None,
            arrival: None,
            price: None,
            currency: currency.into(),
            flight_number: String::new(),
            stops: None,
            direct: None,
            segments: None,
        }
    }

    pub fn with_times(
        mut self,
        departure: Option<NaiveDateTime>,
        arrival: Option<NaiveDateTime>,
    ) -> Self {
        self.departure = departure;
        self.arrival = arrival;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price).filter(|p| p.is_finite());
        self
    }

    pub fn with_flight_number(mut self, flight_number: impl Into<String>) -> Self {
        self.flight_number = flight_number.into();
        self
    }
}

/// A round trip: an outbound and an inbound leg with a combined price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarePair {
    pub outbound: FareLeg,
    pub inbound: FareLeg,
    /// Combined fare per passenger for both legs.
    pub total_price: Option<f64>,
}

impl FarePair {
    /// Pair two legs, deriving the total from the leg prices when both are
    /// known.
    pub fn new(outbound: FareLeg, inbound: FareLeg) -> Self {
        let total_price = match (outbound.price, inbound.price) {
            (Some(a), Some(b)) => Some(a + b),
            _ => None,
        };
        Self {
            outbound,
            inbound,
            total_price,
        }
    }

    pub fn with_total(mut self, total: Option<f64>) -> Self {
        self.total_price = total.filter(|p| p.is_finite());
        self
    }

    /// Days between outbound and inbound departure dates.
    ///
    /// `None` if either departure timestamp is missing.
    pub fn stay_days(&self) -> Option<i64> {
        let out = self.outbound.departure?.date();
        let back = self.inbound.departure?.date();
        Some((back - out).num_days())
    }
}
