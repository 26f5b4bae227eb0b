//! Command-line argument definitions for the accidents processor
//!
//! Every pipeline setting can come from a flag or, failing that, from its
//! `ACCIDENTS_*` environment variable.

use crate::config::{CompressionAlgorithm, PipelineConfig};
use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_TOP_CITIES, DEFAULT_TOP_STATES_PER_QUARTER};
use crate::models::YearSelection;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the US accidents summary-table processor
#[derive(Debug, Clone, Parser)]
#[command(
    name = "accidents-processor",
    version,
    about = "Turn the US Accidents CSV into pre-aggregated Parquet summary tables",
    long_about = "Ingests the US Accidents CSV, normalizes every record and writes a fixed \
                  catalog of small summary tables (counts by state, severity, weather, time \
                  and rankings) that dashboards load without re-deriving any semantics."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Build every summary table from the accidents CSV
    Build(BuildArgs),
    /// Print a stored summary table
    Show(ShowArgs),
    /// List the summary tables present in the output directory
    List(ListArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct BuildArgs {
    /// Path to the US Accidents CSV
    #[arg(short = 'i', long = "input", value_name = "CSV", env = "ACCIDENTS_SOURCE")]
    pub input: PathBuf,

    /// Directory receiving one Parquet file per summary table
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        env = "ACCIDENTS_OUTPUT",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    pub output: PathBuf,

    /// Years to include: `all`, a year, a range like 2016-2023, or a comma list
    #[arg(long = "years", value_name = "YEARS", env = "ACCIDENTS_YEARS", default_value = "all")]
    pub years: YearSelection,

    /// States kept per year-quarter in the ranking table
    #[arg(
        long = "top-states",
        value_name = "N",
        env = "ACCIDENTS_TOP_STATES",
        default_value_t = DEFAULT_TOP_STATES_PER_QUARTER
    )]
    pub top_states: usize,

    /// Cities kept in the city ranking table
    #[arg(
        long = "top-cities",
        value_name = "N",
        env = "ACCIDENTS_TOP_CITIES",
        default_value_t = DEFAULT_TOP_CITIES
    )]
    pub top_cities: usize,

    /// Tables built concurrently (defaults to the CPU count)
    #[arg(short = 'j', long = "workers", value_name = "COUNT")]
    pub workers: Option<usize>,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long = "compression", default_value = "snappy")]
    pub compression: CompressionAlgorithm,

    /// Only build these tables (comma-separated)
    #[arg(long = "tables", value_name = "LIST", value_delimiter = ',')]
    pub tables: Option<Vec<String>>,
}

impl BuildArgs {
    pub fn to_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default()
            .with_years(self.years.clone())
            .with_top_states_per_quarter(self.top_states)
            .with_top_cities(self.top_cities)
            .with_compression(self.compression);
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(tables) = &self.tables {
            config = config.with_tables(tables.clone());
        }
        config
    }
}

#[derive(Debug, Clone, Parser)]
pub struct ShowArgs {
    /// Summary table name, e.g. state_counts
    #[arg(value_name = "TABLE")]
    pub table: String,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        env = "ACCIDENTS_OUTPUT",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    pub output: PathBuf,

    /// Rows to print
    #[arg(short = 'n', long = "rows", default_value_t = 20)]
    pub rows: usize,
}

#[derive(Debug, Clone, Parser)]
pub struct ListArgs {
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        env = "ACCIDENTS_OUTPUT",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    pub output: PathBuf,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are suppressed in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_parse() {
        let args = Args::try_parse_from([
            "accidents-processor",
            "build",
            "--input",
            "US_Accidents.csv",
            "--years",
            "2019,2021-2022",
            "--top-states",
            "5",
            "--compression",
            "zstd",
            "--tables",
            "state_counts,severity_counts",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.get_log_level(), "debug");
        let Commands::Build(build) = args.command else {
            panic!("expected build command");
        };

        let config = build.to_config();
        assert_eq!(config.top_states_per_quarter, 5);
        assert_eq!(config.top_cities, 200);
        assert_eq!(config.compression, CompressionAlgorithm::Zstd);
        assert!(config.years.includes(Some(2021)));
        assert!(!config.years.includes(Some(2020)));
        assert_eq!(
            config.tables,
            Some(vec!["state_counts".to_string(), "severity_counts".to_string()])
        );
    }

    #[test]
    fn test_invalid_years_rejected() {
        let result = Args::try_parse_from([
            "accidents-processor",
            "build",
            "--input",
            "a.csv",
            "--years",
            "2023-2016",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let args = Args::try_parse_from(["accidents-processor", "list", "-q", "-vvv"]).unwrap();
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }
}
