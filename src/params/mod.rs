//! Epifilter Parameter Engine
//!
//! Turns raw request parameters into typed filters:
//!
//! - **Directives**: `geo=state:ca,tx`, `signal=src:*`, `time=day:20200101-20200107`
//! - **Legacy**: `geo_type` + `geo_values`, `data_source` + `signals`, `time_type` + `time_values`
//! - **Filters**: [`GeoFilter`], [`SourceSignalFilter`], [`TimeFilter`]
//!
//! # Time Tokens
//!
//! ```text
//! day:   YYYYMMDD | YYYY-MM-DD | YYYYMMDD-YYYYMMDD | YYYY-MM-DD--YYYY-MM-DD
//! week:  YYYYWW   | YYYYWW-YYYYWW
//! ```
//!
//! # Examples
//!
//! ```rust
//! use epifilter::config::KeysConfig;
//! use epifilter::params::{RequestFilters, RequestParams};
//!
//! let params = RequestParams::from_query_string(
//!     "signal=src:*&geo=state:ca,tx&time=day:20200101;day:20200102",
//! )?;
//! let filters = RequestFilters::parse(&params, &KeysConfig::default())?;
//!
//! assert!(filters.matches_geo("state", "tx"));
//! assert_eq!(filters.time.count(), 2.0);
//! # Ok::<(), epifilter::params::ParamError>(())
//! ```

mod args;
pub mod calendar;
mod directive;
mod error;
mod extract;
mod filters;
mod legacy;
mod request;
mod scalar;
mod source;
mod time;
mod values;

pub use args::{
    parse_day_arg, parse_day_or_week_arg, parse_day_or_week_range_arg, parse_day_range_arg,
    parse_geo_arg, parse_single_geo_arg, parse_single_source_signal_arg, parse_single_time_arg,
    parse_source_signal_arg, parse_time_arg, parse_time_filter, parse_week_arg,
    parse_week_range_arg,
};
pub use directive::{
    parse_directive_param, parse_directives, parse_single_directive, Directive, DirectiveValues,
};
pub use error::{ParamError, ParamResult};
pub use extract::{extract_strings, require_all, require_any};
pub use filters::{GeoFilter, SourceSignalFilter};
pub use legacy::{parse_geo_filters, parse_source_signal_filters, parse_time_filters, Convention};
pub use request::RequestFilters;
pub use scalar::{normalize_range, parse_day_value, parse_week_value};
pub use source::{ParamSource, RequestParams};
pub use time::{Granularity, TimeFilter, TimeValue};
pub use values::ValueSet;
