//! Pipeline orchestration.
//!
//! Ingests the accidents CSV once, fans the summary table catalog out over
//! concurrent workers, writes each table to the store and reports a run
//! summary. Ingestion failures are fatal; table failures are recorded per
//! table and the run continues.

pub mod fanout;

#[cfg(test)]
pub mod tests;

use self::fanout::TableFanout;

use crate::aggregate::{self, AggregationContext};
use crate::config::PipelineConfig;
use crate::error::{AccidentsError, Result};
use crate::ingest::Ingestor;
use crate::models::{ProcessingStats, TableOutcome};
use crate::store::ParquetStore;

use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tokio::task;
use tracing::info;

/// Main processor turning the accidents CSV into summary tables
#[derive(Debug)]
pub struct PipelineProcessor {
    input_path: PathBuf,
    output_path: PathBuf,
    config: PipelineConfig,
    show_progress: bool,
}

impl PipelineProcessor {
    /// Create a processor for `input_path`, writing tables under `output_path`
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Result<Self> {
        if !input_path.exists() {
            return Err(AccidentsError::InputNotFound { path: input_path });
        }

        Ok(Self {
            input_path,
            output_path,
            config: PipelineConfig::default(),
            show_progress: true,
        })
    }

    /// Configure the processor
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn store(&self) -> ParquetStore {
        ParquetStore::new(&self.output_path).with_compression(self.config.compression)
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        self.config.validate()?;
        let specs = aggregate::select(self.config.tables.as_deref())?;

        println!("{}", "Starting accident table processing".bright_green().bold());
        println!("  {} {}", "Input:".bright_cyan(), self.input_path.display());
        println!("  {} {}", "Output:".bright_cyan(), self.output_path.display());
        println!("  {} {}", "Years:".bright_cyan(), self.config.years);

        // Step 1: Ingest and normalize
        println!("\n{}", "Ingesting accident records...".bright_yellow());
        let ingestor = Ingestor::new(self.config.years.clone());
        let input_path = self.input_path.clone();
        let dataset = task::spawn_blocking(move || ingestor.ingest(&input_path))
            .await
            .map_err(|e| AccidentsError::InvalidInput {
                path: self.input_path.clone(),
                reason: format!("ingestion task failed: {}", e),
            })??;

        let ingest = dataset.stats.clone();
        println!(
            "  {} {} of {} rows ({} rejected)",
            "Kept".bright_green(),
            ingest.rows_kept.to_string().bright_white().bold(),
            ingest.rows_read.to_string().bright_white(),
            ingest.rows_rejected().to_string().bright_white()
        );

        // Step 2: Build and write tables
        fs::create_dir_all(&self.output_path).await?;
        println!(
            "\n{} {} summary tables...",
            "Building".bright_yellow(),
            specs.len()
        );

        let fanout = TableFanout::new(
            self.store(),
            AggregationContext::from(&self.config),
            self.config.workers,
        )
        .with_progress(self.show_progress);
        let outcomes = fanout.run(Arc::new(dataset.frame), &specs).await;

        let tables_written = outcomes.iter().filter(|(_, o)| o.is_written()).count();
        let stats = ProcessingStats {
            ingest,
            tables_written,
            tables_failed: outcomes.len() - tables_written,
            outcomes,
            output_path: self.output_path.clone(),
            processing_time_ms: start_time.elapsed().as_millis(),
        };

        info!(
            "Run finished: {} tables written, {} failed in {}ms",
            stats.tables_written, stats.tables_failed, stats.processing_time_ms
        );
        print_summary(&stats);
        Ok(stats)
    }
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Rows kept:".bright_cyan(),
        stats.ingest.rows_kept.to_string().bright_white().bold()
    );
    if stats.ingest.rows_rejected() > 0 {
        println!(
            "  {} {} (severity: {}, state: {})",
            "Rows rejected:".bright_yellow(),
            stats.ingest.rows_rejected().to_string().bright_yellow(),
            stats.ingest.rejected_severity,
            stats.ingest.rejected_state
        );
    }
    if stats.ingest.unparsed_start_time > 0 {
        println!(
            "  {} {}",
            "Unparsed start times:".bright_yellow(),
            stats.ingest.unparsed_start_time.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {}",
        "Tables written:".bright_cyan(),
        stats.tables_written.to_string().bright_white().bold()
    );

    for (name, outcome) in &stats.outcomes {
        match outcome {
            TableOutcome::Written { rows, .. } => {
                println!("    {} {} ({} rows)", "✓".bright_green(), name, rows);
            }
            TableOutcome::Failed { reason } => {
                println!("    {} {} {}", "✗".bright_red(), name.bright_red(), reason.bright_black());
            }
        }
    }

    if stats.tables_failed > 0 {
        println!(
            "  {} {}",
            "Tables failed:".bright_red(),
            stats.tables_failed.to_string().bright_red().bold()
        );
    }
}
