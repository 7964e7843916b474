//! Web layer for the fare finder.
//!
//! Provides HTTP endpoints for searching fares, downloading results and
//! looking up airports.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
