//! # advisor-scope - Profiler Report Analysis Toolkit
//!
//! advisor-scope parses performance-profiler output - Intel Advisor CSV
//! exports and SDE/VTune diagnostic dumps - into an in-memory model of
//! profiled loops, and answers filtered queries over that model. The
//! results are flat numeric arrays a plotting frontend can draw as
//! arithmetic-intensity scatter plots with roofline ceilings.
//!
//! ## Data Flow
//!
//! ```text
//! Advisor CSV ──► report::AdvisorReport ──► analysis (filters, arrays,
//!                 (loops + children)         sums, summaries)
//!                                               │
//!                                               ▼
//! SDE/VTune ───► roofline (datasets,        export::ScatterSeries
//!                ceilings)                  (JSON for plotting)
//! ```
//!
//! ## Module Structure
//!
//! - [`report`]: the parsed export - loop hierarchy, column store, the
//!   header scan and positional child attachment
//! - [`callsite`]: the call-site string mini-grammar
//!   (`[loop in <sub> at <file>:<line>]`)
//! - [`value`]: numeric coercion of suffixed cells (`0.36s`, `2.9x`)
//! - [`analysis`]: filters and predicates, filtered field projections,
//!   column sums, loop summaries
//! - [`roofline`]: SDE/VTune dump parsing, machine peak tables, ceiling
//!   series
//! - [`export`]: scatter-series JSON for the plotting collaborator
//! - [`display`]: terminal tables
//! - [`cli`] / [`domain`]: argument parsing and shared domain types
//!
//! ## Format Assumptions
//!
//! The export format is flat: a child row always follows its parent
//! directly, so attachment is positional ("most recent top-level loop"),
//! and the hierarchy is one level deep. These are deliberate format
//! assumptions, not general tree parsing.

pub mod analysis;
pub mod callsite;
pub mod cli;
pub mod display;
pub mod domain;
pub mod export;
pub mod report;
pub mod roofline;
pub mod value;
