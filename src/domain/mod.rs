//! Domain model for advisor-scope
//!
//! Core types shared across the parser, query engine and exporters:
//! - Normalized column keys via the newtype pattern
//! - Structured error handling

pub mod errors;
pub mod types;

pub use types::{FieldKey, LoopKind};

pub use errors::{ExportError, ReportError, RooflineError};
