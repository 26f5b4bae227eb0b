//! Concurrent table building.
//!
//! Fans the selected catalog entries out over blocking tasks, bounded by
//! the worker count. Every task reads the same immutable canonical frame
//! and writes its own file, so a failing or panicking table is recorded
//! and the others carry on.

use crate::aggregate::{AggregationContext, TableSpec};
use crate::models::TableOutcome;
use crate::store::ParquetStore;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, error};

/// Builds and stores summary tables concurrently
#[derive(Debug, Clone)]
pub struct TableFanout {
    store: ParquetStore,
    ctx: AggregationContext,
    workers: usize,
    show_progress: bool,
}

impl TableFanout {
    pub fn new(store: ParquetStore, ctx: AggregationContext, workers: usize) -> Self {
        Self {
            store,
            ctx,
            workers: workers.max(1),
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message("Building tables");
        pb
    }

    /// Build and write every table in `specs`.
    ///
    /// Returns one outcome per table, in the order given.
    pub async fn run(
        &self,
        frame: Arc<DataFrame>,
        specs: &[&'static TableSpec],
    ) -> Vec<(String, TableOutcome)> {
        let pb = self.progress_bar(specs.len());
        let concurrent_limit = self.workers.min(specs.len()).max(1);
        debug!(
            "Building {} tables with up to {} concurrent workers",
            specs.len(),
            concurrent_limit
        );

        let mut outcomes: Vec<(usize, String, TableOutcome)> = stream::iter(specs.iter().enumerate())
            .map(|(idx, spec)| {
                let frame = Arc::clone(&frame);
                let store = self.store.clone();
                let ctx = self.ctx;
                let pb = pb.clone();
                let spec: &'static TableSpec = *spec;
                async move {
                    let outcome = match task::spawn_blocking(move || build_and_write(spec, &frame, &ctx, &store)).await {
                        Ok(outcome) => outcome,
                        Err(e) => TableOutcome::Failed {
                            reason: format!("table task aborted: {}", e),
                        },
                    };

                    if let TableOutcome::Failed { reason } = &outcome {
                        error!("Table {} failed: {}", spec.name, reason);
                    }
                    pb.set_message(format!("Built: {}", spec.name));
                    pb.inc(1);
                    (idx, spec.name.to_string(), outcome)
                }
            })
            .buffer_unordered(concurrent_limit)
            .collect()
            .await;

        pb.finish_with_message("All tables built");

        outcomes.sort_by_key(|(idx, _, _)| *idx);
        outcomes
            .into_iter()
            .map(|(_, name, outcome)| (name, outcome))
            .collect()
    }
}

fn build_and_write(
    spec: &TableSpec,
    frame: &DataFrame,
    ctx: &AggregationContext,
    store: &ParquetStore,
) -> TableOutcome {
    let result = spec
        .build(frame, ctx)
        .and_then(|mut table| {
            let rows = table.height();
            store.write(spec.name, &mut table).map(|path| (rows, path))
        });

    match result {
        Ok((rows, path)) => {
            debug!("Table {} written: {} rows", spec.name, rows);
            TableOutcome::Written { rows, path }
        }
        Err(e) => TableOutcome::Failed {
            reason: e.to_string(),
        },
    }
}
