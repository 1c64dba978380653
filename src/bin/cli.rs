//! Epifilter CLI
//!
//! Command-line interface for the parameter engine:
//! - Parse a request query string into filters
//! - Collapse day or week values into ranges
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epifilter::config::{generate_default_config, Config, LoggingConfig};
use epifilter::params::{
    parse_directives, parse_time_filter, Granularity, RequestFilters, RequestParams, TimeFilter,
};

#[derive(Parser)]
#[command(name = "epifilter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parse epidemiological query parameters into filters")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a query string and print the filters as JSON
    Parse {
        /// Query string, e.g. "signal=src:sig&geo=state:ca&time=day:20200101"
        query: String,
    },

    /// Collapse day or week values into minimal ranges
    Ranges {
        /// Granularity of the values
        #[arg(short, long, value_enum, default_value = "day")]
        granularity: GranularityArg,
        /// Values, comma-separated or as separate arguments; `*` for all
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    Day,
    Week,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Day => Granularity::Day,
            GranularityArg::Week => Granularity::Week,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging);

    match cli.command {
        Commands::Parse { query } => {
            let params = RequestParams::from_query_string(&query)?;
            let filters = RequestFilters::parse(&params, &config.keys)
                .with_context(|| format!("invalid request: {}", query))?;
            println!("{}", serde_json::to_string_pretty(&filters)?);
            eprintln!("estimated rows per issue: {}", filters.count());
        }

        Commands::Ranges {
            granularity,
            values,
        } => {
            let granularity = Granularity::from(granularity);
            let line = format!("{}:{}", granularity, values.join(","));
            let filters = parse_directives("values", &line)?
                .into_iter()
                .map(|directive| parse_time_filter(granularity, directive.values))
                .collect::<Result<Vec<_>, _>>()?;

            // a `*` value prints as the wildcard
            let merged = TimeFilter::merge("values", filters)?.context("no values given")?;
            println!("{}", serde_json::to_string(merged.to_ranges().values())?);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("cannot write {:?}", path))?;
                    tracing::info!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("epifilter={}", logging.level).into());

    // logs go to stderr so stdout stays parseable
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
