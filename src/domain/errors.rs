//! Structured error types for advisor-scope
//!
//! Using thiserror for automatic Display implementation and error chaining.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("no header row containing \"ID\" found in {}", path.display())]
    MissingHeader { path: PathBuf },

    #[error("failed to read report {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum RooflineError {
    #[error("counter \"{counter}\" not found in {}", path.display())]
    MissingCounter { counter: &'static str, path: PathBuf },

    #[error("counter \"{counter}\" in {} is not an integer: {raw:?}", path.display())]
    MalformedCounter { counter: &'static str, path: PathBuf, raw: String },

    #[error("elapsed time must be positive, got {0}")]
    InvalidElapsed(f64),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_display() {
        let err = ReportError::MissingHeader { path: PathBuf::from("run1.csv") };
        assert_eq!(err.to_string(), "no header row containing \"ID\" found in run1.csv");
    }

    #[test]
    fn test_missing_counter_display() {
        let err = RooflineError::MissingCounter {
            counter: "Total FLOPs",
            path: PathBuf::from("sde.out"),
        };
        assert!(err.to_string().contains("Total FLOPs"));
        assert!(err.to_string().contains("sde.out"));
    }
}
