//! Export functionality
//!
//! Queries produce arrays; plotting lives elsewhere. This module
//! serializes the arrays a plotting frontend consumes.

pub mod scatter;

pub use scatter::{ScatterSeries, ScatterSpec, SeriesSource};
