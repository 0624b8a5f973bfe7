//! Core data models for match stats.

mod player;

pub use player::*;
