//! Data layer for the bikeshare explorer.
//!
//! Loads per-city trip CSV files into [`TripTable`]s, narrows them by month
//! and weekday, computes the four statistics reports and pages through raw
//! rows for display.
//!
//! [`TripTable`]: bikeshare_core::models::TripTable

pub mod aggregator;
pub mod filter;
pub mod pager;
pub mod reader;
pub mod stats;
