//! Configuration management and validation.
//!
//! Provides the pipeline configuration (year selection, ranking
//! thresholds, concurrency) and the Parquet compression choice used by
//! the summary table store.

use crate::constants::{DEFAULT_TOP_CITIES, DEFAULT_TOP_STATES_PER_QUARTER};
use crate::error::{AccidentsError, Result};
use crate::models::YearSelection;
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = AccidentsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(AccidentsError::configuration(format!(
                "unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                other
            ))),
        }
    }
}

/// Global configuration for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Which years feed the summary tables
    pub years: YearSelection,

    /// States kept per year-quarter in the ranking table
    pub top_states_per_quarter: usize,

    /// Cities kept in the city ranking table
    pub top_cities: usize,

    /// Maximum number of tables built concurrently
    pub workers: usize,

    /// Parquet compression for summary tables
    pub compression: CompressionAlgorithm,

    /// Restrict the run to these tables (None = whole catalog)
    pub tables: Option<Vec<String>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            years: YearSelection::All,
            top_states_per_quarter: DEFAULT_TOP_STATES_PER_QUARTER,
            top_cities: DEFAULT_TOP_CITIES,
            workers: num_cpus::get().max(1),
            compression: CompressionAlgorithm::default(),
            tables: None,
        }
    }
}

impl PipelineConfig {
    /// Create configuration with a year selection
    pub fn with_years(mut self, years: YearSelection) -> Self {
        self.years = years;
        self
    }

    /// Set the per-quarter state ranking depth
    pub fn with_top_states_per_quarter(mut self, n: usize) -> Self {
        self.top_states_per_quarter = n;
        self
    }

    /// Set the city ranking depth
    pub fn with_top_cities(mut self, n: usize) -> Self {
        self.top_cities = n;
        self
    }

    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Restrict the run to a subset of the table catalog
    pub fn with_tables(mut self, tables: Vec<String>) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(AccidentsError::configuration("workers must be at least 1"));
        }
        if let Some(tables) = &self.tables {
            if tables.is_empty() {
                return Err(AccidentsError::configuration(
                    "table selection is empty",
                ));
            }
        }

        debug!(
            "Pipeline config: years={}, top_states={}, top_cities={}, workers={}, compression={:?}",
            self.years, self.top_states_per_quarter, self.top_cities, self.workers, self.compression
        );
        Ok(())
    }
}
