//! Conversion from fare API DTOs to domain types.
//!
//! Malformed fields degrade to "absent" rather than failing the record.
//! Only an unparseable airport code drops a record, since a fare without
//! an origin or destination cannot be filtered or shown.

use serde_json::Value;
use tracing::warn;

use crate::domain::{FareLeg, FarePair, Iata, InvalidIata, parse_timestamp};

use super::types::{FareDto, FaresResponse, LegDto, PriceDto};

/// Read a numeric value that may arrive as a number or a numeric string.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

fn price_value(price: Option<&PriceDto>) -> Option<f64> {
    price.and_then(|p| p.value.as_ref()).and_then(number)
}

/// Convert one leg. `currency` is used when the leg carries none.
pub fn convert_leg(dto: &LegDto, currency: &str) -> Result<FareLeg, InvalidIata> {
    let origin = Iata::parse_normalized(&dto.departure_airport.iata_code)?;
    let destination = Iata::parse_normalized(&dto.arrival_airport.iata_code)?;

    let leg_currency = dto
        .price
        .as_ref()
        .and_then(|p| p.currency_code.as_deref())
        .unwrap_or(currency);

    let mut leg = FareLeg::new(origin, destination, leg_currency).with_times(
        dto.departure_date.as_deref().and_then(parse_timestamp),
        dto.arrival_date.as_deref().and_then(parse_timestamp),
    );
    leg.price = price_value(dto.price.as_ref());
    leg.flight_number = dto.flight_number.clone().unwrap_or_default();
    leg.stops = dto.stops.as_ref().and_then(integer);
    leg.direct = dto.is_direct.as_ref().and_then(boolean);
    leg.segments = dto.segments.as_ref().map(|segments| {
        segments
            .iter()
            .map(|s| s.flight_number.clone().unwrap_or_default())
            .collect()
    });

    Ok(leg)
}

/// Convert a fare into a pair. Returns `Ok(None)` for one-way fares.
fn convert_pair(dto: &FareDto, currency: &str) -> Result<Option<FarePair>, InvalidIata> {
    let Some(inbound) = dto.inbound.as_ref() else {
        return Ok(None);
    };

    let outbound = convert_leg(&dto.outbound, currency)?;
    let inbound = convert_leg(inbound, currency)?;
    let summary = price_value(dto.summary.as_ref().and_then(|s| s.price.as_ref()));

    let pair = FarePair::new(outbound, inbound);
    Ok(Some(match summary {
        Some(total) => pair.with_total(Some(total)),
        None => pair,
    }))
}

/// Convert a one-way response, skipping records with bad airport codes.
pub fn convert_one_way(response: &FaresResponse, currency: &str) -> Vec<FareLeg> {
    let mut legs = Vec::with_capacity(response.fares.len());

    for fare in &response.fares {
        match convert_leg(&fare.outbound, currency) {
            Ok(leg) => legs.push(leg),
            Err(e) => warn!(error = %e, "skipping fare with invalid airport code"),
        }
    }

    legs
}

/// Convert a round-trip response, skipping records with bad airport codes
/// and fares without an inbound leg.
pub fn convert_round_trips(response: &FaresResponse, currency: &str) -> Vec<FarePair> {
    let mut pairs = Vec::with_capacity(response.fares.len());

    for fare in &response.fares {
        match convert_pair(fare, currency) {
            Ok(Some(pair)) => pairs.push(pair),
            Ok(None) => warn!("skipping round-trip fare without inbound leg"),
            Err(e) => warn!(error = %e, "skipping fare with invalid airport code"),
        }
    }

    pairs
}
