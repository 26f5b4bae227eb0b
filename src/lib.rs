//! US Accidents Processor Library
//!
//! Turns the US Accidents CSV into a fixed catalog of small, pre-aggregated
//! Parquet summary tables that dashboard pages load directly.
//!
//! This library provides tools for:
//! - Validating the input header and normalizing every record
//! - Building each summary table (counts, severity breakdowns, rankings)
//! - Writing tables atomically to a Parquet store and reading them back
//! - Degrading to empty tables on the read side when a table is missing

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod ingest;
pub mod models;
pub mod processor;
pub mod reader;
pub mod reference;
pub mod schema;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export commonly used types
pub use aggregate::{AggregationContext, TableSpec, catalog};
pub use config::{CompressionAlgorithm, PipelineConfig};
pub use error::{AccidentsError, Result};
pub use ingest::{CanonicalDataset, Ingestor};
pub use models::{IngestStats, ProcessingStats, Severity, TableOutcome, YearQuarter, YearSelection};
pub use processor::PipelineProcessor;
pub use reader::DashboardReader;
pub use store::ParquetStore;
