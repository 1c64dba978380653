//! Filter construction from directive parameters
//!
//! Multi-directive functions build one filter per directive; single-directive
//! functions require exactly one concrete `type:value` pair. The scalar
//! helpers at the bottom read one day or week token from a parameter.

use crate::params::directive::{
    parse_directive_param, parse_single_directive, Directive, DirectiveValues,
};
use crate::params::error::{ParamError, ParamResult};
use crate::params::filters::{GeoFilter, SourceSignalFilter};
use crate::params::scalar::{parse_day_value, parse_week_value};
use crate::params::source::ParamSource;
use crate::params::time::{Granularity, TimeFilter, TimeValue};
use crate::params::values::ValueSet;

/// One [`GeoFilter`] per directive in `key`
pub fn parse_geo_arg(params: &impl ParamSource, key: &str) -> ParamResult<Vec<GeoFilter>> {
    parse_directive_param(params, key)?
        .into_iter()
        .map(|d| GeoFilter::new(d.kind, d.values.into()))
        .collect()
}

/// A [`GeoFilter`] holding exactly one value
pub fn parse_single_geo_arg(params: &impl ParamSource, key: &str) -> ParamResult<GeoFilter> {
    let (geo_type, geo_value) = parse_single_directive(params, key)?;
    GeoFilter::new(geo_type, ValueSet::single(geo_value))
}

/// One [`SourceSignalFilter`] per directive in `key`
pub fn parse_source_signal_arg(
    params: &impl ParamSource,
    key: &str,
) -> ParamResult<Vec<SourceSignalFilter>> {
    parse_directive_param(params, key)?
        .into_iter()
        .map(|d| SourceSignalFilter::new(d.kind, d.values.into()))
        .collect()
}

/// A [`SourceSignalFilter`] holding exactly one signal
pub fn parse_single_source_signal_arg(
    params: &impl ParamSource,
    key: &str,
) -> ParamResult<SourceSignalFilter> {
    let (source, signal) = parse_single_directive(params, key)?;
    SourceSignalFilter::new(source, ValueSet::single(signal))
}

/// Build a time filter from a granularity and raw tokens
pub fn parse_time_filter(granularity: Granularity, values: DirectiveValues) -> ParamResult<TimeFilter> {
    match values {
        DirectiveValues::Wildcard => Ok(TimeFilter::wildcard(granularity)),
        DirectiveValues::List(tokens) => {
            let values = tokens
                .iter()
                .map(|token| granularity.parse_value(token))
                .collect::<ParamResult<Vec<_>>>()?;
            TimeFilter::new(granularity, values)
        }
    }
}

/// The single merged [`TimeFilter`] described by `key`, if any
///
/// Granularities are checked for every directive before any value is parsed,
/// so mixing day and week is reported ahead of malformed values.
pub fn parse_time_arg(params: &impl ParamSource, key: &str) -> ParamResult<Option<TimeFilter>> {
    let directives = parse_directive_param(params, key)?;

    let mut typed: Vec<(Granularity, DirectiveValues)> = Vec::with_capacity(directives.len());
    for Directive { kind, values } in directives {
        let granularity = Granularity::parse(&kind)?;
        if let Some((first, _)) = typed.first() {
            if *first != granularity {
                let mut granularities = vec![*first, granularity];
                granularities.sort();
                return Err(ParamError::GranularityConflict {
                    param: key.to_string(),
                    granularities,
                });
            }
        }
        typed.push((granularity, values));
    }

    let filters = typed
        .into_iter()
        .map(|(granularity, values)| parse_time_filter(granularity, values))
        .collect::<ParamResult<Vec<_>>>()?;

    TimeFilter::merge(key, filters)
}

/// A [`TimeFilter`] holding exactly one day or week token
pub fn parse_single_time_arg(params: &impl ParamSource, key: &str) -> ParamResult<TimeFilter> {
    let (kind, value) = parse_single_directive(params, key)?;
    let granularity = Granularity::parse(&kind)?;
    parse_time_filter(granularity, DirectiveValues::List(vec![value]))
}

fn required<'a>(params: &'a impl ParamSource, key: &str) -> ParamResult<&'a str> {
    params.get_non_empty(key).ok_or_else(|| ParamError::required(key))
}

/// A single day (`YYYYMMDD` or `YYYY-MM-DD`)
pub fn parse_day_arg(params: &impl ParamSource, key: &str) -> ParamResult<u32> {
    match parse_day_value(required(params, key)?)? {
        TimeValue::Single(day) => Ok(day),
        TimeValue::Range(..) => Err(ParamError::format(
            format!("{} param", key),
            "YYYYMMDD or YYYY-MM-DD",
        )),
    }
}

/// A single epiweek (`YYYYWW`)
pub fn parse_week_arg(params: &impl ParamSource, key: &str) -> ParamResult<u32> {
    match parse_week_value(required(params, key)?)? {
        TimeValue::Single(week) => Ok(week),
        TimeValue::Range(..) => Err(ParamError::format(format!("{} param", key), "YYYYWW")),
    }
}

/// A day range (`YYYYMMDD-YYYYMMDD` or `YYYY-MM-DD--YYYY-MM-DD`)
pub fn parse_day_range_arg(params: &impl ParamSource, key: &str) -> ParamResult<(u32, u32)> {
    match parse_day_value(required(params, key)?)? {
        TimeValue::Range(start, end) => Ok((start, end)),
        TimeValue::Single(_) => Err(ParamError::format(
            format!("{} param", key),
            "YYYYMMDD-YYYYMMDD or YYYY-MM-DD--YYYY-MM-DD",
        )),
    }
}

/// An epiweek range (`YYYYWW-YYYYWW`)
pub fn parse_week_range_arg(params: &impl ParamSource, key: &str) -> ParamResult<(u32, u32)> {
    match parse_week_value(required(params, key)?)? {
        TimeValue::Range(start, end) => Ok((start, end)),
        TimeValue::Single(_) => Err(ParamError::format(
            format!("{} param", key),
            "YYYYWW-YYYYWW",
        )),
    }
}

/// A single day or epiweek, told apart by token length
///
/// When the parameter is missing and a default key is given, the default is
/// used instead; its granularity is guessed from its digit count.
pub fn parse_day_or_week_arg(
    params: &impl ParamSource,
    key: &str,
    default_value: Option<u32>,
) -> ParamResult<TimeFilter> {
    let Some(value) = params.get_non_empty(key) else {
        let default_value = default_value.ok_or_else(|| ParamError::required(key))?;
        tracing::debug!(key, default_value, "Using default time value");
        let granularity = Granularity::guess_key(default_value);
        return TimeFilter::new(granularity, vec![TimeValue::Single(default_value)]);
    };

    match Granularity::guess(value) {
        Granularity::Week => {
            TimeFilter::new(Granularity::Week, vec![TimeValue::Single(parse_week_arg(params, key)?)])
        }
        Granularity::Day => {
            TimeFilter::new(Granularity::Day, vec![TimeValue::Single(parse_day_arg(params, key)?)])
        }
    }
}

/// A day or epiweek range, told apart by the length of the first bound
pub fn parse_day_or_week_range_arg(params: &impl ParamSource, key: &str) -> ParamResult<TimeFilter> {
    let value = required(params, key)?;
    let first = value.split('-').next().unwrap_or(value);

    let (granularity, (start, end)) = match Granularity::guess(first) {
        Granularity::Week => (Granularity::Week, parse_week_range_arg(params, key)?),
        Granularity::Day => (Granularity::Day, parse_day_range_arg(params, key)?),
    };
    TimeFilter::new(granularity, vec![TimeValue::Range(start, end)])
}
