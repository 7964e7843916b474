//! Data transfer objects for web requests and responses.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::airports::Airport;
use crate::domain::{
    CriteriaError, DateRange, DestinationFilter, Iata, Passengers, SearchCriteria, SortKey,
    StaySpec, TimeWindow, TripMode, TripSpec, WeekdaySet, ceiling_from_input, parse_code_list,
    parse_hhmm,
};
use crate::pipeline::{ResultSet, SearchConfig, SearchResult};

/// Days covered by the departure window when no end date is given.
const DEFAULT_WINDOW_DAYS: u64 = 30;

/// Query string of a fare search.
///
/// Every field arrives as text so that blank form inputs mean "not set"
/// rather than failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Comma-separated origin codes
    #[serde(default)]
    pub origins: String,

    /// Single destination; wins over `destinations`
    pub destination: Option<String>,

    /// Comma-separated destination codes
    pub destinations: Option<String>,

    /// one-way, return or duration
    pub mode: Option<String>,

    /// Departure window start (YYYY-MM-DD)
    pub from: Option<String>,

    /// Departure window end (YYYY-MM-DD)
    pub to: Option<String>,

    /// Return window start, return mode only
    pub return_from: Option<String>,

    /// Return window end, return mode only
    pub return_to: Option<String>,

    /// "3" or "3..5", duration mode only
    pub stay: Option<String>,

    pub step: Option<String>,
    pub adults: Option<String>,
    pub children: Option<String>,

    /// Checkbox: any non-empty value other than "false" or "0" is on
    pub direct: Option<String>,

    /// Per-leg or total ceiling; 0 means no limit
    pub max_price: Option<String>,

    /// Comma-separated weekday names
    pub weekdays: Option<String>,

    pub dep_after: Option<String>,
    pub dep_before: Option<String>,
    pub arr_after: Option<String>,
    pub arr_before: Option<String>,

    pub currency: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,

    /// Export format, read by the export endpoint only
    pub format: Option<String>,
}

/// A set field, trimmed; blank counts as unset.
fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(value: &str) -> Result<NaiveDate, CriteriaError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| CriteriaError::InvalidDate(value.to_string()))
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    value: &Option<String>,
) -> Result<Option<T>, CriteriaError> {
    field(value)
        .map(|v| {
            v.parse().map_err(|_| CriteriaError::InvalidNumber {
                field: name,
                value: v.to_string(),
            })
        })
        .transpose()
}

fn parse_window(
    after: &Option<String>,
    before: &Option<String>,
) -> Result<TimeWindow, CriteriaError> {
    let after = field(after).map(parse_hhmm).transpose()?;
    let before = field(before).map(parse_hhmm).transpose()?;
    Ok(TimeWindow::new(after, before))
}

impl SearchQuery {
    /// Validate the query into search criteria.
    ///
    /// `today` anchors the default departure window.
    pub fn to_criteria(
        &self,
        config: &SearchConfig,
        today: NaiveDate,
    ) -> Result<SearchCriteria, CriteriaError> {
        let origins = parse_code_list(&self.origins)?;

        let mode = field(&self.mode)
            .map(str::parse::<TripMode>)
            .transpose()?
            .unwrap_or(TripMode::OneWay);

        let from = field(&self.from)
            .map(parse_date)
            .transpose()?
            .unwrap_or(today);
        let to = match field(&self.to) {
            Some(to) => parse_date(to)?,
            None => from
                .checked_add_days(Days::new(DEFAULT_WINDOW_DAYS))
                .unwrap_or(from),
        };
        let window = DateRange::new(from, to)?;

        let inbound = match (field(&self.return_from), field(&self.return_to)) {
            (Some(start), Some(end)) => Some(DateRange::new(parse_date(start)?, parse_date(end)?)?),
            (Some(day), None) | (None, Some(day)) => Some(DateRange::single(parse_date(day)?)),
            (None, None) => None,
        };

        let stay = field(&self.stay).map(str::parse::<StaySpec>).transpose()?;
        let step = parse_number("step", &self.step)?.unwrap_or(config.default_step_days);

        let trip = TripSpec::from_parts(mode, window, inbound, stay, step)?;

        let destinations = match field(&self.destination) {
            Some(single) => DestinationFilter::single(Iata::parse_normalized(single)?),
            None => {
                let codes = field(&self.destinations).unwrap_or("");
                DestinationFilter::set(parse_code_list(codes)?)
            }
        };

        let passengers = Passengers::new(
            parse_number("adults", &self.adults)?.unwrap_or(1),
            parse_number("children", &self.children)?.unwrap_or(0),
        )?;

        let direct_only = field(&self.direct).is_some_and(|v| !matches!(v, "false" | "0" | "off"));

        let weekdays = field(&self.weekdays)
            .map(WeekdaySet::parse_list)
            .transpose()?
            .unwrap_or_default();

        let sort = field(&self.sort)
            .map(str::parse::<SortKey>)
            .transpose()?
            .unwrap_or_default();

        let currency = field(&self.currency).unwrap_or(&config.default_currency);
        let ceiling = ceiling_from_input(parse_number("max price", &self.max_price)?)?;
        let departure_window = parse_window(&self.dep_after, &self.dep_before)?;
        let arrival_window = parse_window(&self.arr_after, &self.arr_before)?;
        let limit = parse_number("limit", &self.limit)?;

        let criteria = SearchCriteria::new(origins, trip)?
            .with_destinations(destinations)
            .with_direct_only(direct_only)
            .with_price_ceiling(ceiling)?
            .with_weekdays(weekdays)
            .with_departure_window(departure_window)
            .with_arrival_window(arrival_window)
            .with_currency(currency)
            .with_passengers(passengers)
            .with_sort(sort)
            .with_limit(limit);

        Ok(criteria)
    }
}

/// JSON body of a successful search.
#[derive(Debug, Serialize)]
pub struct SearchResponse<'a> {
    pub mode: TripMode,

    /// Number of rows returned
    pub count: usize,

    /// Fare queries issued; zero when served from cache
    pub queries_issued: usize,

    pub from_cache: bool,

    /// Field names in column order
    pub columns: &'static [&'static str],

    pub rows: &'a ResultSet,
}

impl<'a> SearchResponse<'a> {
    pub fn new(mode: TripMode, result: &'a SearchResult) -> Self {
        Self {
            mode,
            count: result.rows.len(),
            queries_issued: result.queries_issued,
            from_cache: result.from_cache,
            columns: result.rows.columns(),
            rows: &result.rows,
        }
    }
}

/// Request to search airports.
#[derive(Debug, Deserialize)]
pub struct AirportSearchRequest {
    /// Search query (code, city, name or country)
    pub q: String,

    /// Maximum results (default 10)
    pub limit: Option<usize>,
}

/// An airport in search results.
#[derive(Debug, Serialize)]
pub struct AirportResult {
    pub code: Iata,
    pub label: String,
    pub city: String,
    pub name: String,
    pub country: String,
}

impl From<Airport> for AirportResult {
    fn from(airport: Airport) -> Self {
        Self {
            label: airport.label(),
            code: airport.code,
            city: airport.city,
            name: airport.name,
            country: airport.country,
        }
    }
}

/// Response for airport search.
#[derive(Debug, Serialize)]
pub struct AirportSearchResponse {
    pub airports: Vec<AirportResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn code(s: &str) -> Iata {
        Iata::parse(s).unwrap()
    }

    fn query(origins: &str) -> SearchQuery {
        SearchQuery {
            origins: origins.to_string(),
            ..Default::default()
        }
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn minimal_query_defaults() {
        let criteria = query("bgy, mxp")
            .to_criteria(&SearchConfig::default(), today())
            .unwrap();

        assert_eq!(criteria.origins, vec![code("BGY"), code("MXP")]);
        let TripSpec::OneWay { dates } = criteria.trip else {
            panic!("expected one-way trip");
        };
        assert_eq!(dates.start(), today());
        assert_eq!(dates.end(), NaiveDate::from_ymd_opt(2025, 10, 31).unwrap());
        assert!(!criteria.direct_only);
        assert_eq!(criteria.currency, "EUR");
        assert_eq!(criteria.price_ceiling, None);
    }

    #[test]
    fn blank_fields_are_unset() {
        let mut q = query("BGY");
        q.destination = some("");
        q.max_price = some(" ");
        q.weekdays = some("");
        q.dep_after = some("");
        q.limit = some("");

        let criteria = q.to_criteria(&SearchConfig::default(), today()).unwrap();
        assert!(criteria.destinations.is_unrestricted());
        assert!(criteria.weekdays.is_empty());
        assert!(criteria.departure_window.is_unbounded());
        assert_eq!(criteria.limit, None);
    }

    #[test]
    fn duration_query() {
        let mut q = query("FCO");
        q.mode = some("duration");
        q.destination = some("bva");
        q.destinations = some("STN,DUB");
        q.from = some("2025-10-01");
        q.to = some("2025-10-05");
        q.stay = some("3");
        q.direct = some("on");
        q.max_price = some("100");
        q.weekdays = some("lun,ven");
        q.dep_after = some("06:00");
        q.adults = some("2");
        q.children = some("1");
        q.sort = some("group");
        q.currency = some("gbp");

        let criteria = q.to_criteria(&SearchConfig::default(), today()).unwrap();
        assert_eq!(criteria.destinations.single, Some(code("BVA")));
        assert!(criteria.direct_only);
        assert_eq!(criteria.price_ceiling, Some(100.0));
        assert!(criteria.weekdays.contains(Weekday::Fri));
        assert_eq!(criteria.passengers.total(), 3);
        assert_eq!(criteria.sort, SortKey::GroupTotal);
        assert_eq!(criteria.currency, "GBP");
        assert!(matches!(
            criteria.trip,
            TripSpec::Duration {
                stay: StaySpec::Exact { days: 3 },
                step_days: 1,
                ..
            }
        ));
    }

    #[test]
    fn zero_price_means_no_limit() {
        let mut q = query("BGY");
        q.max_price = some("0");
        let criteria = q.to_criteria(&SearchConfig::default(), today()).unwrap();
        assert_eq!(criteria.price_ceiling, None);
    }

    #[test]
    fn return_mode_single_day() {
        let mut q = query("BGY");
        q.mode = some("return");
        q.return_from = some("2025-10-08");

        let criteria = q.to_criteria(&SearchConfig::default(), today()).unwrap();
        let TripSpec::Return { inbound, .. } = criteria.trip else {
            panic!("expected return trip");
        };
        assert_eq!(inbound.len_days(), 1);
    }

    #[test]
    fn invalid_inputs() {
        let config = SearchConfig::default();

        assert_eq!(
            query("").to_criteria(&config, today()).unwrap_err(),
            CriteriaError::NoOrigins
        );
        assert!(matches!(
            query("ROMA").to_criteria(&config, today()),
            Err(CriteriaError::InvalidCode(_))
        ));

        let mut q = query("BGY");
        q.from = some("01/10/2025");
        assert_eq!(
            q.to_criteria(&config, today()).unwrap_err(),
            CriteriaError::InvalidDate("01/10/2025".into())
        );

        let mut q = query("BGY");
        q.adults = some("two");
        assert!(matches!(
            q.to_criteria(&config, today()),
            Err(CriteriaError::InvalidNumber {
                field: "adults",
                ..
            })
        ));

        let mut q = query("BGY");
        q.mode = some("duration");
        assert_eq!(
            q.to_criteria(&config, today()).unwrap_err(),
            CriteriaError::Missing("stay length")
        );

        let mut q = query("BGY");
        q.max_price = some("-5");
        assert_eq!(
            q.to_criteria(&config, today()).unwrap_err(),
            CriteriaError::InvalidPrice(-5.0)
        );

        let mut q = query("BGY");
        q.dep_before = some("25:00");
        assert!(matches!(
            q.to_criteria(&config, today()),
            Err(CriteriaError::InvalidTime(_))
        ));
    }
}
