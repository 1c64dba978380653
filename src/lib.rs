//! # Epifilter
//!
//! Query parameter engine for epidemiological time-series APIs. Parses
//! geography, source/signal and time parameters into typed filters.
//!
//! ## Features
//!
//! - **Two grammars**: colon-delimited directives and legacy marker parameters
//! - **Time tokens**: days (`YYYYMMDD`, `YYYY-MM-DD`) and MMWR epiweeks (`YYYYWW`)
//! - **Range algebra**: normalization, wildcard absorption, merging, collapse to ranges
//! - **Cardinality**: upper bound on result rows per request
//!
//! ## Modules
//!
//! - [`params`]: Tokenizer, scalar parsers, filter values and request parsing
//! - [`config`]: Parameter names and logging configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use epifilter::{KeysConfig, RequestFilters, RequestParams};
//!
//! let params = RequestParams::new()
//!     .with("data_source", "src")
//!     .with("signals", "sig")
//!     .with("geo", "county:06001,06003")
//!     .with("time", "week:202001-202004");
//!
//! let filters = RequestFilters::parse(&params, &KeysConfig::default())?;
//! assert_eq!(filters.count(), 8.0);
//! # Ok::<(), epifilter::ParamError>(())
//! ```

pub mod config;
pub mod params;

// Re-export top-level types for convenience
pub use params::{
    GeoFilter, Granularity, ParamError, ParamResult, ParamSource, RequestFilters, RequestParams,
    SourceSignalFilter, TimeFilter, TimeValue, ValueSet,
};

pub use config::{Config, ConfigError, KeysConfig, LoggingConfig};
