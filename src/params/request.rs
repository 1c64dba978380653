//! All filters of one request

use serde::Serialize;

use crate::config::KeysConfig;
use crate::params::error::ParamResult;
use crate::params::filters::{GeoFilter, SourceSignalFilter};
use crate::params::legacy::{parse_geo_filters, parse_source_signal_filters, parse_time_filters};
use crate::params::source::ParamSource;
use crate::params::time::{Granularity, TimeFilter};

/// Geography, source/signal and time filters of a request
///
/// Filters within one list are alternatives; the three families combine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestFilters {
    pub geo: Vec<GeoFilter>,
    pub signals: Vec<SourceSignalFilter>,
    pub time: TimeFilter,
}

impl RequestFilters {
    /// Parse every filter family, legacy or directive, failing on the first error
    pub fn parse(params: &impl ParamSource, keys: &KeysConfig) -> ParamResult<Self> {
        let signals = parse_source_signal_filters(params, keys)?;
        let geo = parse_geo_filters(params, keys)?;
        let time = parse_time_filters(params, keys)?;

        tracing::debug!(
            geo = geo.len(),
            signals = signals.len(),
            granularity = %time.granularity(),
            "Parsed request filters"
        );

        Ok(Self { geo, signals, time })
    }

    pub fn matches_geo(&self, geo_type: &str, geo_value: &str) -> bool {
        self.geo.iter().any(|f| f.matches(geo_type, geo_value))
    }

    pub fn matches_signal(&self, source: &str, signal: &str) -> bool {
        self.signals.iter().any(|f| f.matches(source, signal))
    }

    pub fn matches_time(&self, granularity: Granularity, key: u32) -> bool {
        self.time.matches(granularity, key)
    }

    /// Upper bound on the number of rows per issue: the product of the
    /// summed family counts, infinite when any family is unbounded
    pub fn count(&self) -> f64 {
        let geo: f64 = self.geo.iter().map(GeoFilter::count).sum();
        let signals: f64 = self.signals.iter().map(SourceSignalFilter::count).sum();
        geo * signals * self.time.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::error::ParamError;
    use crate::params::source::RequestParams;

    fn parse(qs: &str) -> ParamResult<RequestFilters> {
        let params = RequestParams::from_query_string(qs)?;
        RequestFilters::parse(&params, &KeysConfig::default())
    }

    #[test]
    fn test_parse_directive_request() {
        let filters =
            parse("signal=src:sig1,sig2&geo=state:ca,tx;county:06001&time=day:20200101-20200107")
                .unwrap();
        assert_eq!(filters.geo.len(), 2);
        assert!(filters.matches_geo("county", "06001"));
        assert!(filters.matches_signal("src", "sig2"));
        assert!(filters.matches_time(Granularity::Day, 20200105));
        assert!(!filters.matches_time(Granularity::Day, 20200108));
        assert_eq!(filters.count(), 3.0 * 2.0 * 7.0);
    }

    #[test]
    fn test_parse_legacy_request() {
        let filters = parse(
            "data_source=src&signals=sig&geo_type=state&geo_values=ca&time_type=week&time_values=202001",
        )
        .unwrap();
        assert!(filters.matches_geo("state", "ca"));
        assert!(filters.matches_time(Granularity::Week, 202001));
        assert_eq!(filters.count(), 1.0);
    }

    #[test]
    fn test_wildcard_is_unbounded() {
        let filters = parse("signal=src:*&geo=state:ca&time=day:20200101").unwrap();
        assert_eq!(filters.count(), f64::INFINITY);
    }

    #[test]
    fn test_first_error_wins() {
        let err = parse("geo=state:ca&time=day:20200101").unwrap_err();
        assert!(matches!(err, ParamError::AmbiguousFilter { .. }));
        let err = parse("signal=src:a&geo=state:ca&time=day:20200101;week:202001").unwrap_err();
        assert!(matches!(err, ParamError::GranularityConflict { .. }));
    }

    #[test]
    fn test_serialize() {
        let filters = parse("signal=src:*&geo=state:ca&time=day:20200101-20200102").unwrap();
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json["signals"][0]["signal"], "wildcard");
        assert_eq!(json["time"]["granularity"], "day");
        assert_eq!(
            json["time"]["values"],
            serde_json::json!({"values": [[20200101, 20200102]]})
        );
    }
}
