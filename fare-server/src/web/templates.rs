//! Askama templates for the web frontend.

use askama::Template;

use crate::airports::AirportDirectory;
use crate::domain::{Iata, TripMode, WEEKDAY_NAMES};
use crate::export::ExportFormat;
use crate::pipeline::{OneWayRow, ResultSet, RoundTripRow, SearchResult};

/// Home page with search form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub airports: Vec<AirportOption>,
    pub weekdays: &'static [&'static str],
    pub today: String,
}

impl IndexTemplate {
    pub fn new(directory: &AirportDirectory, today: chrono::NaiveDate) -> Self {
        Self {
            airports: directory
                .iter()
                .map(|a| AirportOption {
                    code: a.code.to_string(),
                    label: a.label(),
                })
                .collect(),
            weekdays: &WEEKDAY_NAMES,
            today: today.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Search results page.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub mode: String,
    pub summary: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub exports: Vec<ExportLink>,
}

/// Download link for one export format.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportLink {
    pub label: String,
    pub href: String,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

/// Airport option for the form pickers.
#[derive(Debug, Clone)]
pub struct AirportOption {
    pub code: String,
    pub label: String,
}

fn money(amount: Option<f64>) -> String {
    amount.map(|a| format!("{a:.2}")).unwrap_or_default()
}

fn route(directory: &AirportDirectory, origin: &Iata, destination: &Iata) -> String {
    format!(
        "{} → {}",
        directory.label(origin),
        directory.label(destination)
    )
}

const ONE_WAY_HEADERS: &[&str] = &[
    "Price",
    "Currency",
    "Route",
    "Departure",
    "Arrival",
    "Flight",
];

const ROUND_TRIP_HEADERS: &[&str] = &[
    "Total",
    "Group total",
    "Currency",
    "Route",
    "Nights",
    "Outbound",
    "Outbound flight",
    "Return",
    "Return flight",
];

fn one_way_cells(row: &OneWayRow, directory: &AirportDirectory) -> Vec<String> {
    vec![
        money(row.price),
        row.currency.clone(),
        route(directory, &row.origin, &row.destination),
        row.departure_display.clone(),
        row.arrival_display.clone(),
        row.flight_number.clone(),
    ]
}

fn round_trip_cells(row: &RoundTripRow, directory: &AirportDirectory) -> Vec<String> {
    vec![
        money(row.total_price),
        money(row.group_total),
        row.currency.clone(),
        route(directory, &row.origin, &row.destination),
        row.stay_days.map(|d| d.to_string()).unwrap_or_default(),
        row.outbound_departure_display.clone(),
        row.outbound_flight_number.clone(),
        row.inbound_departure_display.clone(),
        row.inbound_flight_number.clone(),
    ]
}

/// The search query with every `format` pair removed.
fn without_format(query: &str) -> String {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some("format"))
        .collect::<Vec<_>>()
        .join("&")
}

/// One export link per format, repeating the search's own query.
fn export_links(query: &str) -> Vec<ExportLink> {
    let base = without_format(query);
    ExportFormat::ALL
        .iter()
        .map(|format| {
            let href = if base.is_empty() {
                format!("/search/export?format={format}")
            } else {
                format!("/search/export?{base}&format={format}")
            };
            ExportLink {
                label: format!("Download {}", format.extension().to_uppercase()),
                href,
            }
        })
        .collect()
}

impl ResultsTemplate {
    pub fn new(
        mode: TripMode,
        result: &SearchResult,
        directory: &AirportDirectory,
        query: &str,
    ) -> Self {
        let (headers, rows) = match result.rows.as_ref() {
            ResultSet::OneWay(rows) => (
                ONE_WAY_HEADERS.to_vec(),
                rows.iter().map(|r| one_way_cells(r, directory)).collect(),
            ),
            ResultSet::RoundTrip(rows) => (
                ROUND_TRIP_HEADERS.to_vec(),
                rows.iter()
                    .map(|r| round_trip_cells(r, directory))
                    .collect(),
            ),
        };

        let summary = match (result.rows.len(), result.from_cache) {
            (1, _) => "1 fare found".to_string(),
            (n, false) => format!("{n} fares found ({} queries)", result.queries_issued),
            (n, true) => format!("{n} fares found (cached)"),
        };

        Self {
            mode: mode.to_string(),
            summary,
            headers,
            rows,
            exports: export_links(query),
        }
    }
}
