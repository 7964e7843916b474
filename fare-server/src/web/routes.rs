//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, RawQuery, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{CriteriaError, SearchCriteria};
use crate::export::{ExportError, ExportFormat, to_bytes};
use crate::fares::FareError;
use crate::pipeline::{SearchError, SearchResult, Searcher, connect};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/airports/search", get(search_airports))
        .route("/search", get(search))
        .route("/search/export", get(export))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with search form.
async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    let page = IndexTemplate::new(&state.airports, Local::now().date_naive());
    Html(
        page.render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Search airports by code, city, name or country.
async fn search_airports(
    State(state): State<AppState>,
    Query(req): Query<AirportSearchRequest>,
) -> Json<AirportSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let airports = state
        .airports
        .search(&req.q, limit)
        .into_iter()
        .map(AirportResult::from)
        .collect();

    Json(AirportSearchResponse { airports })
}

fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Validate the query and run one search.
async fn run_search(
    state: &AppState,
    query: &SearchQuery,
) -> Result<(SearchCriteria, SearchResult), AppError> {
    let criteria = query.to_criteria(&state.config, Local::now().date_naive())?;
    let source = connect(
        state.backend.as_ref(),
        &criteria.currency,
        criteria.passengers,
    )?;

    let result = Searcher::new(&source, &state.config)
        .with_cache(&state.cache)
        .search(&criteria)
        .await?;

    Ok((criteria, result))
}

/// Search fares. Returns JSON, or an HTML table for browsers.
async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
    Query(query): Query<SearchQuery>,
) -> Response {
    let html = accepts_html(&headers);

    let (criteria, result) = match run_search(&state, &query).await {
        Ok(found) => found,
        Err(e) if html => return e.into_html(),
        Err(e) => return e.into_response(),
    };

    if html {
        let query = raw.unwrap_or_default();
        let page = ResultsTemplate::new(criteria.mode(), &result, &state.airports, &query);
        match page.render() {
            Ok(body) => Html(body).into_response(),
            Err(e) => AppError::Internal {
                message: format!("Template error: {}", e),
            }
            .into_html(),
        }
    } else {
        Json(SearchResponse::new(criteria.mode(), &result)).into_response()
    }
}

/// Search fares and return the rows as a file download.
async fn export(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    let format = match query.format.as_deref() {
        Some(f) => f.parse::<ExportFormat>()?,
        None => ExportFormat::Csv,
    };

    let (_, result) = run_search(&state, &query).await?;
    let bytes = to_bytes(&result.rows, format)?;

    let disposition = format!("attachment; filename=\"{}\"", format.file_name("fares"));
    let disposition = HeaderValue::from_str(&disposition).map_err(|e| AppError::Internal {
        message: e.to_string(),
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(format.content_type())),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl AppError {
    fn parts(&self) -> (StatusCode, &str) {
        match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        }
    }

    fn log(&self) {
        let (status, message) = self.parts();
        if status.is_server_error() {
            error!(%status, reason = message, "request failed");
        } else {
            warn!(%status, reason = message, "request rejected");
        }
    }

    /// Render as an HTML error page.
    fn into_html(self) -> Response {
        self.log();
        let (status, message) = self.parts();
        let page = ErrorTemplate {
            title: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message: message.to_string(),
        };
        let body = page
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e));
        (status, Html(body)).into_response()
    }
}

impl From<CriteriaError> for AppError {
    fn from(e: CriteriaError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<FareError> for AppError {
    fn from(e: FareError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            e if e.is_invalid_request() => AppError::BadRequest {
                message: e.to_string(),
            },
            SearchError::Fetch { .. } => AppError::BadGateway {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::UnknownFormat(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let (status, message) = self.parts();
        let body = Json(ErrorResponse {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod routes_tests;
