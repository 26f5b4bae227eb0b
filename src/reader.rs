//! Read side used by dashboard pages.
//!
//! Pages never re-derive table semantics; they load a named table and
//! render it. An absent or unreadable table renders as empty instead of
//! failing the page.

use crate::models::Severity;
use crate::store::ParquetStore;
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct DashboardReader {
    store: ParquetStore,
}

impl DashboardReader {
    pub fn new(store: ParquetStore) -> Self {
        Self { store }
    }

    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(ParquetStore::new(root))
    }

    /// Load a summary table, degrading to an empty frame on any failure
    pub fn load(&self, name: &str) -> DataFrame {
        match self.store.read(name) {
            Ok(table) => table,
            Err(e) => {
                warn!("Summary table '{}' unavailable, rendering empty: {}", name, e);
                DataFrame::empty()
            }
        }
    }

    /// Names of the tables available to render
    pub fn available(&self) -> Vec<String> {
        self.store.list().unwrap_or_else(|e| {
            warn!("Could not list summary tables in {}: {}", self.store.root().display(), e);
            Vec::new()
        })
    }
}

/// Display label for a severity ordinal
pub fn severity_label(ordinal: i64) -> &'static str {
    Severity::from_code(ordinal)
        .map(Severity::label)
        .unwrap_or("Unknown")
}
