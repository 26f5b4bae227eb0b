//! Error handling for accident table processing.
//!
//! Separates the fatal failures (bad input schema, unusable configuration)
//! from the recoverable ones that are scoped to a single table or store
//! entry, so the pipeline can report them independently.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccidentsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input file not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Input schema error in {path}: missing expected columns [{}]", .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("Input schema error in {path}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    #[error("Invalid year-quarter label '{label}': {reason}")]
    InvalidYearQuarter { label: String, reason: String },

    #[error("Aggregation '{table}' failed: {reason}")]
    Aggregation { table: String, reason: String },

    #[error("Summary table not found: {name}")]
    TableNotFound { name: String },

    #[error("Summary table '{name}' is corrupt at {path}: {reason}")]
    CorruptTable {
        name: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to write summary table '{name}' to {path}: {reason}")]
    StoreWrite {
        name: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Invalid summary table name '{name}': only ASCII letters, digits and '_' are allowed")]
    InvalidTableName { name: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl AccidentsError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an aggregation error for a named table
    pub fn aggregation(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Aggregation {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// True for the store's "never written" condition, as opposed to a
    /// table that exists but cannot be decoded.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, AccidentsError>;
