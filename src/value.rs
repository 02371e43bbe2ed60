//! Cell values and numeric coercion
//!
//! Advisor exports mix plain numbers ("0.3307"), unit-suffixed numbers
//! ("0.3624s", "2.91x") and free text in the same columns. Queries coerce
//! cells to numbers where possible and keep the raw text otherwise.

use std::fmt;

/// A single cell produced by a query: numeric when the raw text coerces,
/// raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Coerce a raw cell, keeping the text when it is not numeric.
    pub fn coerce(raw: &str) -> Self {
        match to_number(raw) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(raw.to_string()),
        }
    }

    /// The numeric value, if this cell coerced.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Unit suffixes Advisor appends to numeric cells: seconds and gain
/// multipliers.
const UNIT_SUFFIXES: [char; 2] = ['s', 'x'];

/// Parse a cell as `f64`, retrying with a trailing unit suffix stripped.
///
/// Returns `None` for empty or non-numeric text; callers keep the raw
/// string in that case.
#[must_use]
pub fn to_number(raw: &str) -> Option<f64> {
    if let Ok(n) = raw.parse::<f64>() {
        return Some(n);
    }
    let last = raw.chars().last()?;
    if UNIT_SUFFIXES.contains(&last) {
        return raw[..raw.len() - last.len_utf8()].parse::<f64>().ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_float_parses() {
        assert_eq!(to_number("2.5"), Some(2.5));
        assert_eq!(to_number("0.3307"), Some(0.3307));
    }

    #[test]
    fn test_seconds_suffix_stripped() {
        assert_eq!(to_number("1.23s"), Some(1.23));
    }

    #[test]
    fn test_gain_suffix_stripped() {
        assert_eq!(to_number("4x"), Some(4.0));
    }

    #[test]
    fn test_non_numeric_returns_none() {
        assert_eq!(to_number("abc"), None);
        assert_eq!(to_number("vectorized"), None);
    }

    #[test]
    fn test_empty_returns_none() {
        assert_eq!(to_number(""), None);
    }

    #[test]
    fn test_suffix_alone_is_not_a_number() {
        assert_eq!(to_number("s"), None);
        assert_eq!(to_number("x"), None);
    }

    #[test]
    fn test_coerce_keeps_raw_text() {
        assert_eq!(CellValue::coerce("0.155"), CellValue::Number(0.155));
        assert_eq!(
            CellValue::coerce("Vectorized (Body)"),
            CellValue::Text("Vectorized (Body)".to_string())
        );
    }
}
