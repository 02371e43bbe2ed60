//! Scatter-series export for plotting frontends
//!
//! A plotting surface wants parallel arrays: x (arithmetic intensity),
//! y (Gflop/s), per-point marker size and color, and per-point labels for
//! interactive picking. This module projects those arrays out of a parsed
//! report, honoring the same filters as any other query, and serializes
//! them as JSON.

use crate::analysis::Filter;
use crate::domain::ExportError;
use crate::report::{AdvisorReport, KEY_AI, KEY_CALL_SITES, KEY_GFLOPS};
use crate::value::CellValue;
use serde::Serialize;
use std::io::Write;

/// Where one marker channel (size or color) comes from.
#[derive(Debug)]
pub enum SeriesSource {
    /// Project a report column; empty or non-numeric cells become 0.
    Key(String),
    /// The same fixed value for every point.
    Fixed(f64),
}

/// How to build a scatter series from a report.
#[derive(Debug)]
pub struct ScatterSpec {
    pub include_children: bool,
    pub filters: Vec<Filter>,
    pub size: SeriesSource,
    pub color: SeriesSource,
}

impl Default for ScatterSpec {
    fn default() -> Self {
        ScatterSpec {
            include_children: true,
            filters: Vec::new(),
            // Matches the default marker size the plotting scripts used
            size: SeriesSource::Fixed(20.0),
            color: SeriesSource::Fixed(0.0),
        }
    }
}

/// Parallel point arrays for one scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub size: Vec<f64>,
    pub color: Vec<f64>,
    pub labels: Vec<String>,
}

impl ScatterSeries {
    /// Project x, y, size, color and labels out of a report.
    ///
    /// All five arrays are equal-length because they traverse the same
    /// filtered loop set.
    #[must_use]
    pub fn from_report(report: &AdvisorReport, spec: &ScatterSpec) -> Self {
        let numeric = |field: &str| -> Vec<f64> {
            report
                .field_array(field, spec.include_children, &spec.filters)
                .iter()
                .map(|v| v.as_number().unwrap_or(0.0))
                .collect()
        };

        let x = numeric(KEY_AI);
        let n = x.len();
        let channel = |source: &SeriesSource| match source {
            SeriesSource::Key(key) => numeric(key),
            SeriesSource::Fixed(value) => vec![*value; n],
        };

        ScatterSeries {
            y: numeric(KEY_GFLOPS),
            size: channel(&spec.size),
            color: channel(&spec.color),
            labels: report
                .field_array(KEY_CALL_SITES, spec.include_children, &spec.filters)
                .into_iter()
                .map(|v| match v {
                    CellValue::Text(s) => s,
                    CellValue::Number(n) => n.to_string(),
                })
                .collect(),
            x,
        }
    }

    /// Number of points in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when no point passed the filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Serialize as JSON for the plotting collaborator.
    ///
    /// # Errors
    ///
    /// Serialization or write failures.
    pub fn write_json(&self, writer: impl Write) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
