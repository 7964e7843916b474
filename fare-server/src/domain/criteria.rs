//! Search criteria: everything the user chose for one search invocation.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::airport::Iata;
use super::dates::{DateRange, StaySpec};
use super::error::CriteriaError;
use super::time::TimeWindow;
use super::weekday::WeekdaySet;

/// Which kind of itinerary to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripMode {
    OneWay,
    Return,
    Duration,
}

impl FromStr for TripMode {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-way" | "oneway" | "one_way" => Ok(TripMode::OneWay),
            "return" | "round-trip" => Ok(TripMode::Return),
            "duration" => Ok(TripMode::Duration),
            other => Err(CriteriaError::UnknownOption {
                field: "mode",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TripMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TripMode::OneWay => "one-way",
            TripMode::Return => "return",
            TripMode::Duration => "duration",
        })
    }
}

/// Dates and stay lengths for one search, per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum TripSpec {
    /// Single flights departing within `dates`.
    OneWay { dates: DateRange },
    /// Round trips with independent outbound and inbound date ranges.
    Return {
        outbound: DateRange,
        inbound: DateRange,
    },
    /// Round trips of a given stay length departing within `window`,
    /// probing every `step_days`-th day.
    Duration {
        window: DateRange,
        stay: StaySpec,
        step_days: u32,
    },
}

impl TripSpec {
    pub fn one_way(dates: DateRange) -> Self {
        TripSpec::OneWay { dates }
    }

    pub fn round_trip(outbound: DateRange, inbound: DateRange) -> Self {
        TripSpec::Return { outbound, inbound }
    }

    /// Duration-mode trip. The step must be at least one day.
    pub fn duration(
        window: DateRange,
        stay: StaySpec,
        step_days: u32,
    ) -> Result<Self, CriteriaError> {
        if step_days == 0 {
            return Err(CriteriaError::ZeroStep);
        }
        Ok(TripSpec::Duration {
            window,
            stay,
            step_days,
        })
    }

    pub fn mode(&self) -> TripMode {
        match self {
            TripSpec::OneWay { .. } => TripMode::OneWay,
            TripSpec::Return { .. } => TripMode::Return,
            TripSpec::Duration { .. } => TripMode::Duration,
        }
    }

    /// Assemble a trip from loosely typed inputs.
    ///
    /// `window` is the outbound range in every mode. Return mode needs
    /// `inbound`, duration mode needs `stay`; inputs the mode does not use
    /// are ignored.
    pub fn from_parts(
        mode: TripMode,
        window: DateRange,
        inbound: Option<DateRange>,
        stay: Option<StaySpec>,
        step_days: u32,
    ) -> Result<Self, CriteriaError> {
        match mode {
            TripMode::OneWay => Ok(TripSpec::one_way(window)),
            TripMode::Return => inbound
                .map(|inbound| TripSpec::round_trip(window, inbound))
                .ok_or(CriteriaError::Missing("return dates")),
            TripMode::Duration => {
                let stay = stay.ok_or(CriteriaError::Missing("stay length"))?;
                TripSpec::duration(window, stay, step_days)
            }
        }
    }
}

/// Destination restriction.
///
/// A single override, when set, takes precedence over the set; the set is
/// then ignored entirely. An empty set with no override is unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DestinationFilter {
    pub single: Option<Iata>,
    pub set: BTreeSet<Iata>,
}

impl DestinationFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn single(code: Iata) -> Self {
        Self {
            single: Some(code),
            set: BTreeSet::new(),
        }
    }

    pub fn set(codes: impl IntoIterator<Item = Iata>) -> Self {
        Self {
            single: None,
            set: codes.into_iter().collect(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.single.is_none() && self.set.is_empty()
    }
}

/// Passenger counts for group totals and passenger-aware fare sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Passengers {
    adults: u8,
    children: u8,
}

impl Passengers {
    pub const MAX_ADULTS: u8 = 9;
    pub const MAX_CHILDREN: u8 = 9;

    pub fn new(adults: u8, children: u8) -> Result<Self, CriteriaError> {
        if adults == 0 {
            return Err(CriteriaError::InvalidPassengers("at least one adult is required"));
        }
        if adults > Self::MAX_ADULTS {
            return Err(CriteriaError::InvalidPassengers("at most 9 adults"));
        }
        if children > Self::MAX_CHILDREN {
            return Err(CriteriaError::InvalidPassengers("at most 9 children"));
        }
        Ok(Self { adults, children })
    }

    pub fn adults(&self) -> u8 {
        self.adults
    }

    pub fn children(&self) -> u8 {
        self.children
    }

    /// Total number of travellers.
    pub fn total(&self) -> u32 {
        u32::from(self.adults) + u32::from(self.children)
    }
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
        }
    }
}

/// Ordering applied to the assembled rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Departure time (outbound departure for round trips).
    #[default]
    Departure,
    /// Fare of a single leg (outbound leg for round trips).
    LegPrice,
    /// Combined round-trip fare (the leg fare for one-way rows).
    TotalPrice,
    /// Combined fare times passenger count.
    GroupTotal,
}

impl FromStr for SortKey {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "departure" | "time" => Ok(SortKey::Departure),
            "price" | "leg-price" => Ok(SortKey::LegPrice),
            "total" | "total-price" => Ok(SortKey::TotalPrice),
            "group" | "group-total" => Ok(SortKey::GroupTotal),
            other => Err(CriteriaError::UnknownOption {
                field: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Departure => "departure",
            SortKey::LegPrice => "leg-price",
            SortKey::TotalPrice => "total-price",
            SortKey::GroupTotal => "group-total",
        })
    }
}

/// Interpret a user-supplied price ceiling, where 0 means "no limit".
/// Negative and non-finite values are rejected.
pub fn ceiling_from_input(value: Option<f64>) -> Result<Option<f64>, CriteriaError> {
    match value {
        None => Ok(None),
        Some(v) if v == 0.0 => Ok(None),
        Some(v) if v.is_finite() && v > 0.0 => Ok(Some(v)),
        Some(v) => Err(CriteriaError::InvalidPrice(v)),
    }
}

/// The full set of parameters for one search invocation.
///
/// Built once, then only read. Setters consume and return `self` so a
/// criteria value is complete before it is handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCriteria {
    pub origins: Vec<Iata>,
    pub destinations: DestinationFilter,
    pub trip: TripSpec,
    pub direct_only: bool,
    pub price_ceiling: Option<f64>,
    pub weekdays: WeekdaySet,
    pub departure_window: TimeWindow,
    pub arrival_window: TimeWindow,
    pub currency: String,
    pub passengers: Passengers,
    pub sort: SortKey,
    /// Maximum rows returned; 0 or `None` means unbounded.
    pub limit: Option<usize>,
}

impl SearchCriteria {
    /// Start from origins and a trip spec, with every filter off.
    ///
    /// Rejects an empty origin list.
    pub fn new(origins: Vec<Iata>, trip: TripSpec) -> Result<Self, CriteriaError> {
        if origins.is_empty() {
            return Err(CriteriaError::NoOrigins);
        }
        Ok(Self {
            origins,
            destinations: DestinationFilter::any(),
            trip,
            direct_only: false,
            price_ceiling: None,
            weekdays: WeekdaySet::new(),
            departure_window: TimeWindow::unbounded(),
            arrival_window: TimeWindow::unbounded(),
            currency: "EUR".to_string(),
            passengers: Passengers::default(),
            sort: SortKey::default(),
            limit: None,
        })
    }

    pub fn with_destinations(mut self, destinations: DestinationFilter) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn with_direct_only(mut self, direct_only: bool) -> Self {
        self.direct_only = direct_only;
        self
    }

    /// Set a price ceiling. Must be finite and non-negative.
    pub fn with_price_ceiling(mut self, ceiling: Option<f64>) -> Result<Self, CriteriaError> {
        if let Some(c) = ceiling
            && !(c.is_finite() && c >= 0.0)
        {
            return Err(CriteriaError::InvalidPrice(c));
        }
        self.price_ceiling = ceiling;
        Ok(self)
    }

    pub fn with_weekdays(mut self, weekdays: WeekdaySet) -> Self {
        self.weekdays = weekdays;
        self
    }

    pub fn with_departure_window(mut self, window: TimeWindow) -> Self {
        self.departure_window = window;
        self
    }

    pub fn with_arrival_window(mut self, window: TimeWindow) -> Self {
        self.arrival_window = window;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into().trim().to_ascii_uppercase();
        self
    }

    pub fn with_passengers(mut self, passengers: Passengers) -> Self {
        self.passengers = passengers;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn mode(&self) -> TripMode {
        self.trip.mode()
    }

    /// Canonical string identifying this exact parameter tuple.
    ///
    /// Two criteria produce the same key iff every field is equal, which
    /// makes it usable as a memoization key despite the float ceiling.
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}
