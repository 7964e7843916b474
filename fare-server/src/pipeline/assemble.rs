//! Result assembly: fare records to exportable rows.
//!
//! One-way and round-trip searches produce differently shaped rows. Both
//! shapes serialize with a fixed column order, which is also the header
//! row of every export.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{FareLeg, FarePair, Iata, Passengers, TripMode, format_display};

/// A row type with a stable, named column order.
///
/// `COLUMNS` must list the serialized field names in declaration order.
pub trait TabularRow: Serialize {
    const COLUMNS: &'static [&'static str];
}

/// One output row for a one-way fare.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneWayRow {
    pub price: Option<f64>,
    pub currency: String,
    pub origin: Iata,
    pub destination: Iata,
    pub departure: Option<NaiveDateTime>,
    pub arrival: Option<NaiveDateTime>,
    pub flight_number: String,
    pub departure_display: String,
    pub arrival_display: String,
}

impl OneWayRow {
    pub fn from_leg(leg: &FareLeg) -> Self {
        Self {
            price: leg.price,
            currency: leg.currency.clone(),
            origin: leg.origin,
            destination: leg.destination,
            departure: leg.departure,
            arrival: leg.arrival,
            flight_number: leg.flight_number.clone(),
            departure_display: format_display(leg.departure),
            arrival_display: format_display(leg.arrival),
        }
    }
}

impl TabularRow for OneWayRow {
    const COLUMNS: &'static [&'static str] = &[
        "price",
        "currency",
        "origin",
        "destination",
        "departure",
        "arrival",
        "flight_number",
        "departure_display",
        "arrival_display",
    ];
}

/// One output row for a round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTripRow {
    pub total_price: Option<f64>,
    /// Total price times passenger count; absent when the total is.
    pub group_total: Option<f64>,
    pub currency: String,
    pub origin: Iata,
    pub destination: Iata,
    pub stay_days: Option<i64>,
    pub outbound_price: Option<f64>,
    pub outbound_departure: Option<NaiveDateTime>,
    pub outbound_arrival: Option<NaiveDateTime>,
    pub outbound_flight_number: String,
    pub outbound_departure_display: String,
    pub inbound_price: Option<f64>,
    pub inbound_departure: Option<NaiveDateTime>,
    pub inbound_arrival: Option<NaiveDateTime>,
    pub inbound_flight_number: String,
    pub inbound_departure_display: String,
}

impl RoundTripRow {
    pub fn from_pair(pair: &FarePair, passengers: Option<Passengers>) -> Self {
        let out = &pair.outbound;
        let back = &pair.inbound;
        Self {
            total_price: pair.total_price,
            group_total: passengers.and_then(|p| group_total(pair.total_price, p)),
            currency: out.currency.clone(),
            origin: out.origin,
            destination: out.destination,
            stay_days: pair.stay_days(),
            outbound_price: out.price,
            outbound_departure: out.departure,
            outbound_arrival: out.arrival,
            outbound_flight_number: out.flight_number.clone(),
            outbound_departure_display: format_display(out.departure),
            inbound_price: back.price,
            inbound_departure: back.departure,
            inbound_arrival: back.arrival,
            inbound_flight_number: back.flight_number.clone(),
            inbound_departure_display: format_display(back.departure),
        }
    }
}

impl TabularRow for RoundTripRow {
    const COLUMNS: &'static [&'static str] = &[
        "total_price",
        "group_total",
        "currency",
        "origin",
        "destination",
        "stay_days",
        "outbound_price",
        "outbound_departure",
        "outbound_arrival",
        "outbound_flight_number",
        "outbound_departure_display",
        "inbound_price",
        "inbound_departure",
        "inbound_arrival",
        "inbound_flight_number",
        "inbound_departure_display",
    ];
}

/// Total for the whole party. Only defined for a finite total.
pub fn group_total(total: Option<f64>, passengers: Passengers) -> Option<f64> {
    total
        .filter(|t| t.is_finite())
        .map(|t| t * f64::from(passengers.total()))
}

/// The rows of one search, in a single shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultSet {
    OneWay(Vec<OneWayRow>),
    RoundTrip(Vec<RoundTripRow>),
}

impl ResultSet {
    /// An empty set shaped for `mode`.
    pub fn empty(mode: TripMode) -> Self {
        match mode {
            TripMode::OneWay => ResultSet::OneWay(Vec::new()),
            TripMode::Return | TripMode::Duration => ResultSet::RoundTrip(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResultSet::OneWay(rows) => rows.len(),
            ResultSet::RoundTrip(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Header row for this shape.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ResultSet::OneWay(_) => OneWayRow::COLUMNS,
            ResultSet::RoundTrip(_) => RoundTripRow::COLUMNS,
        }
    }
}

/// Build one-way rows from surviving legs, preserving order.
pub fn assemble_one_way<'a>(legs: impl IntoIterator<Item = &'a FareLeg>) -> Vec<OneWayRow> {
    legs.into_iter().map(OneWayRow::from_leg).collect()
}

/// Build round-trip rows from surviving pairs, preserving order.
pub fn assemble_round_trips<'a>(
    pairs: impl IntoIterator<Item = &'a FarePair>,
    passengers: Option<Passengers>,
) -> Vec<RoundTripRow> {
    pairs
        .into_iter()
        .map(|pair| RoundTripRow::from_pair(pair, passengers))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn code(s: &str) -> Iata {
        Iata::parse(s).unwrap()
    }

    fn ts(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn sample_pair(total: Option<f64>) -> FarePair {
        let out = FareLeg::new(code("FCO"), code("BVA"), "EUR")
            .with_times(Some(ts(1, 6, 25)), Some(ts(1, 8, 30)))
            .with_price(40.0)
            .with_flight_number("FR 1234");
        let back = FareLeg::new(code("BVA"), code("FCO"), "EUR")
            .with_times(Some(ts(4, 21, 0)), Some(ts(4, 23, 5)))
            .with_price(60.0)
            .with_flight_number("FR 1235");
        FarePair::new(out, back).with_total(total)
    }

    #[test]
    fn group_total_multiplies_party_size() {
        let party = Passengers::new(2, 1).unwrap();
        assert_eq!(group_total(Some(100.0), party), Some(300.0));
        assert_eq!(group_total(None, party), None);
        assert_eq!(group_total(Some(f64::NAN), party), None);
    }

    #[test]
    fn one_way_row_fields() {
        let leg = FareLeg::new(code("BGY"), code("STN"), "GBP")
            .with_times(Some(ts(3, 7, 5)), None)
            .with_price(19.99)
            .with_flight_number("FR 42");
        let row = OneWayRow::from_leg(&leg);

        assert_eq!(row.price, Some(19.99));
        assert_eq!(row.currency, "GBP");
        assert_eq!(row.origin, code("BGY"));
        assert_eq!(row.destination, code("STN"));
        assert_eq!(row.flight_number, "FR 42");
        assert_eq!(row.departure_display, "ven 03/10/2025 07:05");
        assert_eq!(row.arrival_display, "");
    }

    #[test]
    fn round_trip_row_fields() {
        let party = Passengers::new(2, 1).unwrap();
        let row = RoundTripRow::from_pair(&sample_pair(Some(100.0)), Some(party));

        assert_eq!(row.total_price, Some(100.0));
        assert_eq!(row.group_total, Some(300.0));
        assert_eq!(row.stay_days, Some(3));
        assert_eq!(row.outbound_price, Some(40.0));
        assert_eq!(row.inbound_price, Some(60.0));
        assert_eq!(row.outbound_flight_number, "FR 1234");
        assert_eq!(row.inbound_flight_number, "FR 1235");
        assert_eq!(row.outbound_departure_display, "mer 01/10/2025 06:25");
        assert_eq!(row.inbound_departure_display, "sab 04/10/2025 21:00");
    }

    #[test]
    fn group_total_absent_without_total_or_party() {
        let mut pair = sample_pair(None);
        pair.total_price = None;
        let party = Passengers::new(2, 1).unwrap();
        assert_eq!(
            RoundTripRow::from_pair(&pair, Some(party)).group_total,
            None
        );

        let pair = sample_pair(Some(100.0));
        assert_eq!(RoundTripRow::from_pair(&pair, None).group_total, None);
    }

    fn sorted_keys(value: &serde_json::Value) -> Vec<&str> {
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn columns_match_serialized_field_order() {
        let leg = FareLeg::new(code("BGY"), code("STN"), "EUR");
        let value = serde_json::to_value(OneWayRow::from_leg(&leg)).unwrap();
        let mut expected = OneWayRow::COLUMNS.to_vec();
        expected.sort_unstable();
        assert_eq!(sorted_keys(&value), expected);

        let row = RoundTripRow::from_pair(&sample_pair(None), None);
        let value = serde_json::to_value(row).unwrap();
        let mut expected = RoundTripRow::COLUMNS.to_vec();
        expected.sort_unstable();
        assert_eq!(sorted_keys(&value), expected);
    }

    #[test]
    fn assembly_preserves_order() {
        let legs: Vec<FareLeg> = ["STN", "DUB", "BVA"]
            .iter()
            .map(|d| FareLeg::new(code("BGY"), code(d), "EUR"))
            .collect();
        let rows = assemble_one_way(&legs);
        let dests: Vec<&str> = rows.iter().map(|r| r.destination.as_str()).collect();
        assert_eq!(dests, vec!["STN", "DUB", "BVA"]);
    }

    #[test]
    fn result_set_shape() {
        assert!(matches!(ResultSet::empty(TripMode::OneWay), ResultSet::OneWay(_)));
        assert!(matches!(
            ResultSet::empty(TripMode::Duration),
            ResultSet::RoundTrip(_)
        ));
        assert_eq!(
            ResultSet::empty(TripMode::Return).columns(),
            RoundTripRow::COLUMNS
        );
        assert!(ResultSet::empty(TripMode::OneWay).is_empty());
    }
}
