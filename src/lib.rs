//! # Match Stats
//!
//! Fetches a match result page, pulls the per-player scoreboard out of its
//! tables and returns the players ranked by kills, then ACS.
//!
//! ## Architecture
//!
//! - **models**: Player records (raw scoreboard lines and ranked results)
//! - **extract**: Scoreboard parsing and ranking
//! - **fetch**: Page retrieval over HTTP
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod models;

pub use models::*;
