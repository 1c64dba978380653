//! Parameter error types
//!
//! Every failure here is a request-validation failure: the input text was
//! wrong, nothing inside the engine broke.

use thiserror::Error;

use crate::params::time::Granularity;

/// Errors raised while turning request parameters into filters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// A required parameter (or its companion) is absent or empty
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// A value does not match its directive or date/week grammar
    #[error("{value} does not match {expected}")]
    Format { value: String, expected: String },

    /// A range whose end precedes its start
    #[error("the given range {start}-{end} is inverted")]
    RangeInverted { start: u32, end: u32 },

    /// Day and week directives mixed in one request
    #[error("{}: mixes {} time types", .param, format_granularities(.granularities))]
    GranularityConflict {
        param: String,
        granularities: Vec<Granularity>,
    },

    /// Neither the legacy marker nor the directive marker is present
    #[error("missing parameter: {directive} or ({legacy})")]
    AmbiguousFilter { directive: String, legacy: String },

    /// A query string that cannot be percent-decoded
    #[error("cannot decode query string: {0}")]
    Encoding(String),
}

impl ParamError {
    pub(crate) fn format(value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Format {
            value: value.into(),
            expected: expected.into(),
        }
    }

    pub(crate) fn required(param: &str) -> Self {
        Self::MissingParameter(format!("{} param is required", param))
    }

    /// Stable code for the transport layer
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::Format { .. } => "FORMAT_ERROR",
            Self::RangeInverted { .. } => "RANGE_INVERTED",
            Self::GranularityConflict { .. } => "GRANULARITY_CONFLICT",
            Self::AmbiguousFilter { .. } => "AMBIGUOUS_FILTER",
            Self::Encoding(_) => "ENCODING_ERROR",
        }
    }
}

fn format_granularities(granularities: &[Granularity]) -> String {
    granularities
        .iter()
        .map(|g| format!("\"{}\"", g))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Result type for parameter parsing
pub type ParamResult<T> = Result<T, ParamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_inverted_message_names_bounds() {
        let err = ParamError::RangeInverted {
            start: 20200420,
            end: 20200419,
        };
        assert_eq!(err.to_string(), "the given range 20200420-20200419 is inverted");
        assert_eq!(err.code(), "RANGE_INVERTED");
    }

    #[test]
    fn test_granularity_conflict_message() {
        let err = ParamError::GranularityConflict {
            param: "time".to_string(),
            granularities: vec![Granularity::Day, Granularity::Week],
        };
        assert_eq!(err.to_string(), "time: mixes \"day\" and \"week\" time types");
    }

    #[test]
    fn test_ambiguous_message() {
        let err = ParamError::AmbiguousFilter {
            directive: "geo".to_string(),
            legacy: "geo_type and geo_value[s]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "missing parameter: geo or (geo_type and geo_value[s])"
        );
    }
}
