//! Geography and source/signal filters
//!
//! A request may carry several filters of each family. They are never merged;
//! a concrete pair matches the request when any filter in the list matches.

use serde::Serialize;

use crate::params::error::{ParamError, ParamResult};
use crate::params::values::ValueSet;

/// Reject explicit sets without values
fn non_empty(kind: &str, values: ValueSet<String>) -> ParamResult<ValueSet<String>> {
    match values {
        ValueSet::Values(values) => ValueSet::from_values(values)
            .ok_or_else(|| ParamError::MissingParameter(format!("{} values are required", kind))),
        ValueSet::Wildcard => Ok(ValueSet::Wildcard),
    }
}

/// Restriction on geographic units of one type (state, county, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoFilter {
    geo_type: String,
    geo_values: ValueSet<String>,
}

impl GeoFilter {
    /// Build a filter; an explicit set must hold at least one value
    pub fn new(geo_type: impl Into<String>, geo_values: ValueSet<String>) -> ParamResult<Self> {
        let geo_type = geo_type.into();
        let geo_values = non_empty(&geo_type, geo_values)?;
        Ok(Self {
            geo_type,
            geo_values,
        })
    }

    /// Every unit of the given type
    pub fn wildcard(geo_type: impl Into<String>) -> Self {
        Self {
            geo_type: geo_type.into(),
            geo_values: ValueSet::Wildcard,
        }
    }

    pub fn geo_type(&self) -> &str {
        &self.geo_type
    }

    pub fn geo_values(&self) -> &ValueSet<String> {
        &self.geo_values
    }

    pub fn matches(&self, geo_type: &str, geo_value: &str) -> bool {
        self.geo_type == geo_type && self.geo_values.contains(geo_value)
    }

    /// Number of units selected, infinite for the wildcard
    pub fn count(&self) -> f64 {
        self.geo_values.count()
    }
}

/// Restriction on the signals of one data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSignalFilter {
    source: String,
    signal: ValueSet<String>,
}

impl SourceSignalFilter {
    /// Build a filter; an explicit set must hold at least one signal
    pub fn new(source: impl Into<String>, signal: ValueSet<String>) -> ParamResult<Self> {
        let source = source.into();
        let signal = non_empty(&source, signal)?;
        Ok(Self { source, signal })
    }

    /// Every signal of the given source
    pub fn wildcard(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            signal: ValueSet::Wildcard,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn signal(&self) -> &ValueSet<String> {
        &self.signal
    }

    pub fn matches(&self, source: &str, signal: &str) -> bool {
        self.source == source && self.signal.contains(signal)
    }

    /// Number of signals selected, infinite for the wildcard
    pub fn count(&self) -> f64 {
        self.signal.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> ValueSet<String> {
        ValueSet::Values(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_geo_matches() {
        let filter = GeoFilter::new("state", strings(&["ca", "tx"])).unwrap();
        assert!(filter.matches("state", "ca"));
        assert!(!filter.matches("state", "fl"));
        assert!(!filter.matches("county", "ca"));
        assert_eq!(filter.count(), 2.0);
    }

    #[test]
    fn test_geo_wildcard() {
        let filter = GeoFilter::wildcard("county");
        assert!(filter.matches("county", "06001"));
        assert!(!filter.matches("state", "ca"));
        assert_eq!(filter.count(), f64::INFINITY);
    }

    #[test]
    fn test_signal_matches() {
        let filter =
            SourceSignalFilter::new("jhu-csse", strings(&["confirmed_incidence_num"])).unwrap();
        assert!(filter.matches("jhu-csse", "confirmed_incidence_num"));
        assert!(!filter.matches("jhu-csse", "deaths_incidence_num"));
        assert_eq!(filter.count(), 1.0);
        assert!(SourceSignalFilter::wildcard("src").matches("src", "any"));
    }

    #[test]
    fn test_empty_explicit_set_rejected() {
        let err = GeoFilter::new("state", ValueSet::Values(Vec::new())).unwrap_err();
        assert_eq!(
            err,
            ParamError::MissingParameter("state values are required".to_string())
        );
        let err = SourceSignalFilter::new("src", ValueSet::Values(Vec::new())).unwrap_err();
        assert!(matches!(err, ParamError::MissingParameter(_)));
        let filter = GeoFilter::new("state", ValueSet::Wildcard).unwrap();
        assert!(filter.geo_values().is_wildcard());
    }

    #[test]
    fn test_serialize() {
        let filter = GeoFilter::new("state", strings(&["ca"])).unwrap();
        let json = serde_json::to_value(filter).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"geo_type": "state", "geo_values": {"values": ["ca"]}})
        );
    }
}
