//! Low-cost flight fare finder.
//!
//! Queries a fare source for one or more origin airports, filters the
//! fares by destination, directness, price, weekday and time of day,
//! and returns ranked rows ready for display or export. Duration searches
//! enumerate departure dates so every round trip has an exact stay length.

pub mod airports;
pub mod cache;
pub mod cli;
pub mod domain;
pub mod export;
pub mod fares;
pub mod pipeline;
pub mod web;
