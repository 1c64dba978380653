//! Legacy parameter compatibility
//!
//! Older clients send one parameter naming the type and companions holding
//! plain comma-separated values:
//!
//! ```text
//! geo_type=state&geo_values=ca,tx
//! data_source=src&signals=a,b
//! time_type=day&time_values=20200101-20200107,20200110
//! ```
//!
//! Newer clients use directives (`geo=state:ca,tx`). [`Convention::select`]
//! decides once per filter family which grammar applies: the legacy marker
//! wins whenever it is present.

use crate::config::KeysConfig;
use crate::params::args::{parse_geo_arg, parse_source_signal_arg, parse_time_arg, parse_time_filter};
use crate::params::directive::DirectiveValues;
use crate::params::error::{ParamError, ParamResult};
use crate::params::extract::{extract_strings, require_all, require_any};
use crate::params::filters::{GeoFilter, SourceSignalFilter};
use crate::params::source::ParamSource;
use crate::params::time::{Granularity, TimeFilter};

/// Grammar used by one filter family of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// Marker parameter plus companion value list
    Legacy,
    /// Colon-delimited directives
    Directive,
}

impl Convention {
    /// Pick the grammar for a filter family
    ///
    /// Fails when neither the legacy marker nor a `:` in the directive
    /// parameter is present.
    pub fn select(
        params: &impl ParamSource,
        marker: &str,
        directive_key: &str,
        companions: &[String],
    ) -> ParamResult<Self> {
        if params.get_non_empty(marker).is_some() {
            return Ok(Self::Legacy);
        }
        if params.get(directive_key).is_some_and(|v| v.contains(':')) {
            return Ok(Self::Directive);
        }
        Err(ParamError::AmbiguousFilter {
            directive: directive_key.to_string(),
            legacy: format!("{} and {}", marker, companions.join("/")),
        })
    }
}

/// Legacy values: a lone `*` is the wildcard
fn legacy_values(params: &impl ParamSource, keys: &[String]) -> ParamResult<DirectiveValues> {
    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
    require_any(params, &keys, true)?;

    let values: Vec<String> = extract_strings(params, &keys)
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.to_lowercase())
        .collect();

    match values.as_slice() {
        [] => Err(ParamError::MissingParameter(format!(
            "{} values are empty",
            keys.join("/")
        ))),
        [only] if only == "*" => Ok(DirectiveValues::Wildcard),
        _ => Ok(DirectiveValues::List(values)),
    }
}

fn legacy_marker(params: &impl ParamSource, marker: &str) -> String {
    params
        .get_non_empty(marker)
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Geography filters from either convention
pub fn parse_geo_filters(params: &impl ParamSource, keys: &KeysConfig) -> ParamResult<Vec<GeoFilter>> {
    match Convention::select(params, &keys.geo_type, &keys.geo, &keys.geo_values)? {
        Convention::Legacy => {
            tracing::debug!(marker = %keys.geo_type, "Using legacy geo parameters");
            let geo_type = legacy_marker(params, &keys.geo_type);
            let values = legacy_values(params, &keys.geo_values)?;
            Ok(vec![GeoFilter::new(geo_type, values.into())?])
        }
        Convention::Directive => parse_geo_arg(params, &keys.geo),
    }
}

/// Source/signal filters from either convention
pub fn parse_source_signal_filters(
    params: &impl ParamSource,
    keys: &KeysConfig,
) -> ParamResult<Vec<SourceSignalFilter>> {
    match Convention::select(params, &keys.data_source, &keys.signal, &keys.signals)? {
        Convention::Legacy => {
            tracing::debug!(marker = %keys.data_source, "Using legacy signal parameters");
            let source = legacy_marker(params, &keys.data_source);
            let values = legacy_values(params, &keys.signals)?;
            Ok(vec![SourceSignalFilter::new(source, values.into())?])
        }
        Convention::Directive => parse_source_signal_arg(params, &keys.signal),
    }
}

/// The time filter from either convention
pub fn parse_time_filters(params: &impl ParamSource, keys: &KeysConfig) -> ParamResult<TimeFilter> {
    let companions = std::slice::from_ref(&keys.time_values);
    match Convention::select(params, &keys.time_type, &keys.time, companions)? {
        Convention::Legacy => {
            tracing::debug!(marker = %keys.time_type, "Using legacy time parameters");
            require_all(params, &[keys.time_type.as_str(), keys.time_values.as_str()])?;
            let granularity = Granularity::parse(&legacy_marker(params, &keys.time_type))?;
            let values = legacy_values(params, companions)?;
            parse_time_filter(granularity, values)
        }
        Convention::Directive => parse_time_arg(params, &keys.time)?
            .ok_or_else(|| ParamError::required(&keys.time)),
    }
}
