//! Command-line interface.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::cache::CacheConfig;
use crate::domain::{
    CriteriaError, DateRange, DestinationFilter, Iata, Passengers, SearchCriteria, SortKey,
    StaySpec, TimeWindow, TripMode, TripSpec, WeekdaySet, ceiling_from_input, parse_code_list,
    parse_hhmm,
};
use crate::export::ExportFormat;
use crate::fares::{DEFAULT_BASE_URL, FareClientConfig};
use crate::pipeline::SearchConfig;

#[derive(Debug, Parser)]
#[command(name = "fare-server")]
#[command(about = "Search, filter and rank low-cost flight fares")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub backend: BackendArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one search and print or save the results
    Search(Box<SearchArgs>),

    /// Serve the web interface and JSON API
    Serve(ServeArgs),
}

/// Fare source, airport directory and search limits.
#[derive(Debug, Args)]
pub struct BackendArgs {
    /// Fare API base URL
    #[arg(
        long,
        env = "FARE_API_BASE_URL",
        default_value = DEFAULT_BASE_URL,
        global = true
    )]
    pub api_base_url: String,

    /// Serve fares from JSON files in this directory instead of the API
    #[arg(long, env = "FARE_MOCK_DIR", global = true)]
    pub mock_dir: Option<PathBuf>,

    /// Fare API request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Do not send passenger counts to the fare API
    #[arg(long, global = true)]
    pub no_passenger_counts: bool,

    /// Airport directory CSV (code,city,name,country)
    #[arg(long, env = "AIRPORTS_CSV", global = true)]
    pub airports: Option<PathBuf>,

    /// Largest number of fare queries one duration search may issue
    #[arg(long, default_value_t = 500, global = true)]
    pub max_queries: usize,
}

impl BackendArgs {
    pub fn client_config(&self) -> FareClientConfig {
        FareClientConfig::new()
            .with_base_url(&self.api_base_url)
            .with_timeout(self.timeout)
            .with_passenger_counts(!self.no_passenger_counts)
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::default().with_max_queries(self.max_queries)
    }
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "FARE_SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// Seconds a search result stays cached
    #[arg(long, default_value_t = 600)]
    pub cache_ttl: u64,

    /// Maximum cached search results
    #[arg(long, default_value_t = 256)]
    pub cache_capacity: u64,
}

impl ServeArgs {
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default()
            .with_ttl(Duration::from_secs(self.cache_ttl))
            .with_max_capacity(self.cache_capacity)
    }
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Origin airports, comma-separated (e.g. BGY,MXP)
    #[arg(long)]
    pub origins: String,

    /// Single destination; overrides --destinations
    #[arg(long)]
    pub destination: Option<Iata>,

    /// Allowed destinations, comma-separated
    #[arg(long)]
    pub destinations: Option<String>,

    /// one-way, return or duration
    #[arg(long, default_value = "one-way")]
    pub mode: TripMode,

    /// First departure date (default today)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last departure date (default 30 days after --from)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// First return date (return mode)
    #[arg(long)]
    pub return_from: Option<NaiveDate>,

    /// Last return date (return mode; default --return-from)
    #[arg(long)]
    pub return_to: Option<NaiveDate>,

    /// Stay length in days, N or MIN..MAX (duration mode)
    #[arg(long)]
    pub stay: Option<StaySpec>,

    /// Days between candidate departure dates (duration mode)
    #[arg(long, default_value_t = 1)]
    pub step: u32,

    #[arg(long, default_value_t = 1)]
    pub adults: u8,

    #[arg(long, default_value_t = 0)]
    pub children: u8,

    /// Only direct flights
    #[arg(long)]
    pub direct: bool,

    /// Price ceiling; per leg for one-way, total for round trips. 0 = no limit
    #[arg(long, default_value_t = 0.0)]
    pub max_price: f64,

    /// Departure weekdays, comma-separated (lun,mar,mer,gio,ven,sab,dom)
    #[arg(long)]
    pub weekdays: Option<String>,

    /// Earliest departure time, HH:MM
    #[arg(long)]
    pub dep_after: Option<String>,

    /// Latest departure time, HH:MM
    #[arg(long)]
    pub dep_before: Option<String>,

    /// Earliest arrival time, HH:MM
    #[arg(long)]
    pub arr_after: Option<String>,

    /// Latest arrival time, HH:MM
    #[arg(long)]
    pub arr_before: Option<String>,

    #[arg(long, default_value = "EUR")]
    pub currency: String,

    /// departure, leg-price, total-price or group-total
    #[arg(long, default_value = "departure")]
    pub sort: SortKey,

    /// Maximum rows (0 = all)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Write results to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// csv, json or xlsx
    #[arg(long, default_value = "csv")]
    pub format: ExportFormat,
}

fn window(after: Option<&str>, before: Option<&str>) -> Result<TimeWindow, CriteriaError> {
    Ok(TimeWindow::new(
        after.map(parse_hhmm).transpose()?,
        before.map(parse_hhmm).transpose()?,
    ))
}

impl SearchArgs {
    /// Validate the arguments into search criteria.
    pub fn to_criteria(&self, today: NaiveDate) -> Result<SearchCriteria, CriteriaError> {
        let origins = parse_code_list(&self.origins)?;

        let from = self.from.unwrap_or(today);
        let to = self
            .to
            .unwrap_or_else(|| from.checked_add_days(Days::new(30)).unwrap_or(from));
        let outbound = DateRange::new(from, to)?;

        let inbound = match self.return_from {
            Some(start) => Some(DateRange::new(start, self.return_to.unwrap_or(start))?),
            None => self.return_to.map(DateRange::single),
        };

        let trip = TripSpec::from_parts(self.mode, outbound, inbound, self.stay, self.step)?;

        let destinations = match self.destination {
            Some(single) => DestinationFilter::single(single),
            None => DestinationFilter::set(parse_code_list(
                self.destinations.as_deref().unwrap_or(""),
            )?),
        };

        let weekdays = self
            .weekdays
            .as_deref()
            .map(WeekdaySet::parse_list)
            .transpose()?
            .unwrap_or_default();

        let departures = window(self.dep_after.as_deref(), self.dep_before.as_deref())?;
        let arrivals = window(self.arr_after.as_deref(), self.arr_before.as_deref())?;

        let criteria = SearchCriteria::new(origins, trip)?
            .with_destinations(destinations)
            .with_direct_only(self.direct)
            .with_price_ceiling(ceiling_from_input(Some(self.max_price))?)?
            .with_weekdays(weekdays)
            .with_departure_window(departures)
            .with_arrival_window(arrivals)
            .with_currency(&self.currency)
            .with_passengers(Passengers::new(self.adults, self.children)?)
            .with_sort(self.sort)
            .with_limit(self.limit);

        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn search_args(args: &[&str]) -> SearchArgs {
        let cli = Cli::try_parse_from(["fare-server", "search"].iter().chain(args)).unwrap();
        match cli.command {
            Command::Search(args) => *args,
            Command::Serve(_) => panic!("expected search command"),
        }
    }

    #[test]
    fn duration_arguments() {
        let args = search_args(&[
            "--origins",
            "FCO",
            "--destination",
            "BVA",
            "--mode",
            "duration",
            "--from",
            "2025-10-01",
            "--to",
            "2025-10-05",
            "--stay",
            "3",
            "--direct",
            "--max-price",
            "100",
        ]);

        let criteria = args.to_criteria(today()).unwrap();
        assert_eq!(
            criteria.destinations.single,
            Some(Iata::parse("BVA").unwrap())
        );
        assert!(criteria.direct_only);
        assert_eq!(criteria.price_ceiling, Some(100.0));
        assert!(matches!(criteria.trip, TripSpec::Duration { step_days: 1, .. }));
    }

    #[test]
    fn defaults() {
        let args = search_args(&["--origins", "bgy,mxp"]);
        assert_eq!(args.format, ExportFormat::Csv);

        let criteria = args.to_criteria(today()).unwrap();
        assert_eq!(criteria.origins.len(), 2);
        assert_eq!(criteria.price_ceiling, None);
        assert_eq!(criteria.sort, SortKey::Departure);
        assert_eq!(criteria.trip.mode(), TripMode::OneWay);
    }

    #[test]
    fn return_to_defaults_to_return_from() {
        let args = search_args(&[
            "--origins",
            "BGY",
            "--mode",
            "return",
            "--return-from",
            "2025-10-08",
        ]);
        let criteria = args.to_criteria(today()).unwrap();
        let TripSpec::Return { inbound, .. } = criteria.trip else {
            panic!("expected return trip");
        };
        assert_eq!(
            inbound,
            DateRange::single(NaiveDate::from_ymd_opt(2025, 10, 8).unwrap())
        );
    }

    #[test]
    fn invalid_values_rejected() {
        let parse = |extra: &[&str]| {
            let argv = ["fare-server", "search", "--origins", "BGY"];
            Cli::try_parse_from(argv.iter().chain(extra))
        };
        assert!(parse(&["--mode", "multi"]).is_err());
        assert!(parse(&["--format", "xls"]).is_err());

        let args = search_args(&["--origins", "BGY", "--adults", "0"]);
        assert!(matches!(
            args.to_criteria(today()),
            Err(CriteriaError::InvalidPassengers(_))
        ));

        let args = search_args(&["--origins", "BGY", "--weekdays", "lun,fri,xyz"]);
        assert!(matches!(
            args.to_criteria(today()),
            Err(CriteriaError::InvalidWeekday(_))
        ));
    }

    #[test]
    fn spreadsheet_output() {
        let args = search_args(&[
            "--origins",
            "BGY",
            "--format",
            "xlsx",
            "-o",
            "fares.xlsx",
        ]);
        assert_eq!(args.format, ExportFormat::Xlsx);
        assert_eq!(args.output, Some(PathBuf::from("fares.xlsx")));
    }

    #[test]
    fn serve_arguments() {
        let cli = Cli::try_parse_from([
            "fare-server",
            "serve",
            "--addr",
            "0.0.0.0:8080",
            "--cache-ttl",
            "5",
        ])
        .unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.addr.port(), 8080);
        assert_eq!(args.cache_config().ttl, Duration::from_secs(5));
        assert_eq!(cli.backend.search_config().max_queries, 500);
    }
}
