//! Fare API response DTOs.
//!
//! These types map directly to the JSON fare API responses. Almost every
//! field is optional: the API omits what it does not know, and a record
//! with gaps is still worth showing.

use serde::Deserialize;
use serde_json::Value;

/// Response from `oneWayFares` or `roundTripFares`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaresResponse {
    #[serde(default)]
    pub fares: Vec<FareDto>,

    /// Total number of fares the API holds for the query.
    pub total: Option<u64>,
}

/// One fare: a single leg, or two legs for a round trip.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareDto {
    pub outbound: LegDto,

    /// Present only for round trips.
    pub inbound: Option<LegDto>,

    pub summary: Option<SummaryDto>,
}

/// One flight leg.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDto {
    pub departure_airport: AirportDto,
    pub arrival_airport: AirportDto,

    /// Local departure time, e.g. "2025-10-01T06:25:00".
    pub departure_date: Option<String>,

    /// Local arrival time.
    pub arrival_date: Option<String>,

    pub price: Option<PriceDto>,

    pub flight_number: Option<String>,

    /// Number of intermediate stops.
    pub stops: Option<Value>,

    pub is_direct: Option<Value>,

    /// Flight numbers of the segments flown.
    pub segments: Option<Vec<SegmentDto>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportDto {
    pub iata_code: String,
    pub name: Option<String>,
    pub city_name: Option<String>,
    pub country_name: Option<String>,
}

/// A price. `value` is usually a number but has been seen as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDto {
    pub value: Option<Value>,
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub price: Option<PriceDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDto {
    pub flight_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_round_trip_fare() {
        let json = r#"{
            "total": 1,
            "fares": [{
                "outbound": {
                    "departureAirport": {"iataCode": "FCO", "name": "Roma Fiumicino"},
                    "arrivalAirport": {"iataCode": "BVA", "name": "Parigi Beauvais"},
                    "departureDate": "2025-10-01T06:25:00",
                    "arrivalDate": "2025-10-01T08:40:00",
                    "price": {"value": 39.99, "currencyCode": "EUR"},
                    "flightNumber": "FR 4821",
                    "stops": 0
                },
                "inbound": {
                    "departureAirport": {"iataCode": "BVA"},
                    "arrivalAirport": {"iataCode": "FCO"},
                    "departureDate": "2025-10-04T21:00:00",
                    "price": {"value": "40.01", "currencyCode": "EUR"},
                    "segments": [{"flightNumber": "FR 4822"}]
                },
                "summary": {"price": {"value": 80.0, "currencyCode": "EUR"}}
            }]
        }"#;

        let response: FaresResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total, Some(1));
        assert_eq!(response.fares.len(), 1);

        let fare = &response.fares[0];
        assert_eq!(fare.outbound.departure_airport.iata_code, "FCO");
        assert_eq!(fare.outbound.stops, Some(Value::from(0)));
        assert!(fare.outbound.is_direct.is_none());

        let inbound = fare.inbound.as_ref().unwrap();
        assert!(inbound.arrival_date.is_none());
        assert_eq!(inbound.segments.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn missing_fares_list_is_empty() {
        let response: FaresResponse = serde_json::from_str("{}").unwrap();
        assert!(response.fares.is_empty());
    }
}
