//! Loading and cleaning of the country-level CO2/energy dataset.
//!
//! The raw file carries one row per (entity, year) with dozens of columns.
//! This crate keeps what the dashboard charts consume:
//!
//! 1. `loader` reads plain or gzip-compressed CSV, keeps rows whose
//!    `iso_code` is exactly three characters, coerces the nine measure
//!    columns and sorts by (country, year).
//! 2. `interpolation` fills each country's series per measure: linear
//!    interpolation for interior gaps, then forward-fill, then backward-fill.
//! 3. `cache` memoizes the cleaned [`Dataset`] per source token so repeated
//!    renders never re-read or re-clean the file.

pub mod cache;
pub mod error;
pub mod interpolation;
pub mod loader;
pub mod observation;

pub use error::{DataError, Result};
pub use observation::{Dataset, Measure, Observation};

/// Relative path of the dataset the dashboard and CLI read by default.
pub const DEFAULT_DATASET_PATH: &str = "fixtures/owid-co2-data.csv";
