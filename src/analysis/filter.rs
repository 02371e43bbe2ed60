//! Loop filters
//!
//! A query carries an ordered list of filters; a loop is included only
//! when every filter passes (logical AND, empty list passes everything).
//! Each filter compares one field of the loop against an expected value
//! through a [`Predicate`]. A comparison that cannot be made because the
//! field's text does not fit the expected value's type counts as "did not
//! pass" for that loop only; it never aborts the query.

use crate::report::Loop;
use log::debug;
use std::fmt;
use thiserror::Error;

/// The expected side of a filter comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Float(f64),
    IntSet(Vec<i64>),
}

/// Raised by a predicate when the field text and the expected value
/// cannot be compared (e.g. a non-numeric field against an integer set).
#[derive(Debug, Error)]
#[error("filter value type does not match field text")]
pub struct TypeMismatch;

/// Caller-supplied comparison for cases the built-ins do not cover.
pub type CustomPredicate = Box<dyn Fn(&str, &FilterValue) -> Result<bool, TypeMismatch>>;

/// Two-argument comparison `predicate(field_text, expected) -> bool`.
pub enum Predicate {
    /// Exact match: string equality for [`FilterValue::Text`], numeric
    /// equality (field parsed) for `Int`/`Float`.
    Equals,
    /// Integer membership: field parsed as an integer, tested against an
    /// [`FilterValue::IntSet`].
    MemberOf,
    /// Caller-supplied comparison.
    Custom(CustomPredicate),
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals => write!(f, "Equals"),
            Predicate::MemberOf => write!(f, "MemberOf"),
            Predicate::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl Predicate {
    /// Compare one field's raw text against the expected value.
    ///
    /// # Errors
    ///
    /// [`TypeMismatch`] when the comparison cannot be made; callers treat
    /// that as a failed filter, not a failed query.
    pub fn evaluate(&self, actual: &str, expected: &FilterValue) -> Result<bool, TypeMismatch> {
        match self {
            Predicate::Equals => match expected {
                FilterValue::Text(t) => Ok(actual == t),
                FilterValue::Int(i) => {
                    actual.parse::<i64>().map(|a| a == *i).map_err(|_| TypeMismatch)
                }
                FilterValue::Float(x) => {
                    actual.parse::<f64>().map(|a| (a - x).abs() < f64::EPSILON).map_err(|_| TypeMismatch)
                }
                FilterValue::IntSet(_) => Err(TypeMismatch),
            },
            Predicate::MemberOf => match expected {
                FilterValue::IntSet(set) => {
                    actual.parse::<i64>().map(|a| set.contains(&a)).map_err(|_| TypeMismatch)
                }
                _ => Err(TypeMismatch),
            },
            Predicate::Custom(f) => f(actual, expected),
        }
    }
}

/// One (key, expected value, predicate) triple.
#[derive(Debug)]
pub struct Filter {
    pub key: String,
    pub value: FilterValue,
    pub predicate: Predicate,
}

impl Filter {
    /// Exact text match on a field.
    #[must_use]
    pub fn equals(key: &str, text: &str) -> Self {
        Filter {
            key: key.to_string(),
            value: FilterValue::Text(text.to_string()),
            predicate: Predicate::Equals,
        }
    }

    /// Integer membership on a field.
    #[must_use]
    pub fn member_of(key: &str, set: Vec<i64>) -> Self {
        Filter {
            key: key.to_string(),
            value: FilterValue::IntSet(set),
            predicate: Predicate::MemberOf,
        }
    }

    /// Caller-supplied predicate.
    #[must_use]
    pub fn custom(key: &str, value: FilterValue, predicate: CustomPredicate) -> Self {
        Filter { key: key.to_string(), value, predicate: Predicate::Custom(predicate) }
    }

    /// Whether this filter passes for the given loop.
    ///
    /// An unknown field name or a type-mismatched comparison is a failed
    /// filter for this loop, never an error.
    #[must_use]
    pub fn passes(&self, lp: &Loop) -> bool {
        let Some(actual) = lp.get(&self.key) else {
            debug!("filter on unknown field {:?} fails", self.key);
            return false;
        };
        match self.predicate.evaluate(&actual, &self.value) {
            Ok(pass) => pass,
            Err(TypeMismatch) => {
                debug!("filter {:?} does not apply to {:?}, treating as failed", self.key, actual);
                false
            }
        }
    }
}

/// All filters pass (logical AND); the empty list passes everything.
#[must_use]
pub fn passes_all(filters: &[Filter], lp: &Loop) -> bool {
    filters.iter().all(|f| f.passes(lp))
}
