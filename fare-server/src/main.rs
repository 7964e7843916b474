use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fare_server::airports::AirportDirectory;
use fare_server::cli::{BackendArgs, Cli, Command, SearchArgs, ServeArgs};
use fare_server::domain::CriteriaError;
use fare_server::export::{to_bytes, write_atomic};
use fare_server::fares::FareBackend;
use fare_server::pipeline::{SearchError, Searcher, connect};
use fare_server::web::{AppState, create_router};

/// Exit status for invalid search criteria.
const EXIT_INVALID_CRITERIA: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Search(args) => run_search(&cli.backend, &args).await,
        Command::Serve(args) => serve(&cli.backend, &args).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            if is_invalid_criteria(&e) {
                ExitCode::from(EXIT_INVALID_CRITERIA)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn is_invalid_criteria(e: &anyhow::Error) -> bool {
    e.downcast_ref::<CriteriaError>().is_some()
        || e.downcast_ref::<SearchError>()
            .is_some_and(SearchError::is_invalid_request)
}

async fn run_search(backend: &BackendArgs, args: &SearchArgs) -> Result<()> {
    let criteria = args.to_criteria(Local::now().date_naive())?;

    let fares = FareBackend::from_options(backend.mock_dir.as_deref(), backend.client_config())
        .context("failed to set up fare source")?;
    let source = connect(&fares, &criteria.currency, criteria.passengers)
        .context("failed to connect to fare source")?;

    let config = backend.search_config();
    let result = Searcher::new(&source, &config).search(&criteria).await?;
    info!(
        rows = result.rows.len(),
        queries = result.queries_issued,
        "search complete"
    );

    match &args.output {
        Some(path) => write_atomic(path, &result.rows, args.format)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            use std::io::Write;
            let bytes = to_bytes(&result.rows, args.format)?;
            std::io::stdout()
                .write_all(&bytes)
                .context("failed to write results")?;
        }
    }

    Ok(())
}

async fn serve(backend: &BackendArgs, args: &ServeArgs) -> Result<()> {
    let fares = FareBackend::from_options(backend.mock_dir.as_deref(), backend.client_config())
        .context("failed to set up fare source")?;
    if fares.is_mock() {
        info!("serving mock fares");
    }

    let airports = AirportDirectory::load_or_builtin(backend.airports.as_deref());
    info!(
        airports = airports.len(),
        builtin = airports.is_builtin(),
        "airport directory ready"
    );

    let state = AppState::new(
        fares,
        &args.cache_config(),
        backend.search_config(),
        airports,
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    info!("Fare Finder listening on http://{}", args.addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
