//! Wildcard-or-explicit value collections

use serde::Serialize;
use std::borrow::Borrow;

/// The values a filter accepts: everything, or an explicit list
///
/// Explicit lists keep their input order. Lists built through
/// [`ValueSet::from_values`] are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSet<T> {
    /// Matches every value
    Wildcard,
    /// Matches only the listed values
    Values(Vec<T>),
}

impl<T> ValueSet<T> {
    /// Wrap a list of values, `None` if the list is empty
    pub fn from_values(values: Vec<T>) -> Option<Self> {
        if values.is_empty() {
            None
        } else {
            Some(Self::Values(values))
        }
    }

    /// A one-element explicit set
    pub fn single(value: T) -> Self {
        Self::Values(vec![value])
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// Explicit values, `None` for the wildcard
    pub fn values(&self) -> Option<&[T]> {
        match self {
            Self::Wildcard => None,
            Self::Values(values) => Some(values),
        }
    }

    /// Cardinality: infinite for the wildcard, the element count otherwise
    pub fn count(&self) -> f64 {
        match self {
            Self::Wildcard => f64::INFINITY,
            Self::Values(values) => values.len() as f64,
        }
    }
}

impl<T> ValueSet<T> {
    /// Check whether a value is accepted, comparing through `Borrow`
    /// so a `ValueSet<String>` can be queried with a `&str`
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        match self {
            Self::Wildcard => true,
            Self::Values(values) => values.iter().any(|v| v.borrow() == value),
        }
    }
}
