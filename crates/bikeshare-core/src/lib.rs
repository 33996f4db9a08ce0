//! Core types for the bikeshare explorer.
//!
//! Holds the error taxonomy, the trip-record data model (cities, columns,
//! period kinds, the in-memory table), human-readable formatting helpers and
//! the command-line settings shared by the data and binary crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
