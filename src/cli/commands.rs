//! Command implementations for the accidents processor CLI

use crate::aggregate;
use crate::cli::args::{Args, BuildArgs, Commands, ListArgs, ShowArgs};
use crate::processor::PipelineProcessor;
use crate::reader::DashboardReader;
use crate::store::ParquetStore;
use anyhow::{Context, Result};
use colored::*;
use tracing::debug;

/// What a finished command reports back to `main`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// The build ran to completion but some tables failed
    PartialFailure { failed: usize },
}

impl CommandOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            CommandOutcome::Success => 0,
            CommandOutcome::PartialFailure { .. } => 2,
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("accidents_processor={}", log_level)));

    // try_init: a second subscriber (e.g. in tests) is not an error
    if args.quiet {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Dispatch the parsed command
pub async fn run(args: Args) -> Result<CommandOutcome> {
    setup_logging(&args);
    let show_progress = args.show_progress();

    match args.command {
        Commands::Build(build) => run_build(build, show_progress).await,
        Commands::Show(show) => run_show(show),
        Commands::List(list) => run_list(list),
    }
}

async fn run_build(args: BuildArgs, show_progress: bool) -> Result<CommandOutcome> {
    let config = args.to_config();
    debug!("Build configuration: {:?}", config);

    let processor = PipelineProcessor::new(args.input.clone(), args.output.clone())
        .with_context(|| format!("cannot start build from {}", args.input.display()))?
        .with_config(config)
        .with_progress(show_progress);

    let stats = processor.process().await.context("build failed")?;

    if stats.tables_failed > 0 {
        Ok(CommandOutcome::PartialFailure {
            failed: stats.tables_failed,
        })
    } else {
        Ok(CommandOutcome::Success)
    }
}

fn run_show(args: ShowArgs) -> Result<CommandOutcome> {
    // Unknown names are a usage error; a known but missing table renders empty
    if aggregate::lookup(&args.table).is_none() {
        anyhow::bail!(
            "unknown summary table '{}' (run `list` to see the catalog)",
            args.table
        );
    }

    let reader = DashboardReader::open(&args.output);
    let table = reader.load(&args.table);

    println!(
        "{} {} ({} rows)",
        "Table".bright_cyan(),
        args.table.bright_white().bold(),
        table.height()
    );
    if table.height() == 0 && table.width() == 0 {
        println!("  {}", "no data".bright_black());
    } else {
        println!("{}", table.head(Some(args.rows)));
    }
    Ok(CommandOutcome::Success)
}

fn run_list(args: ListArgs) -> Result<CommandOutcome> {
    let store = ParquetStore::new(&args.output);
    let present = store
        .list()
        .with_context(|| format!("cannot list {}", args.output.display()))?;

    println!(
        "{} {}",
        "Summary tables in".bright_green().bold(),
        store.root().display()
    );
    for spec in aggregate::catalog() {
        let marker = if present.iter().any(|name| name == spec.name) {
            "✓".bright_green()
        } else {
            "·".bright_black()
        };
        println!("  {} {:<32} {}", marker, spec.name, spec.description.bright_black());
    }

    let extra: Vec<&String> = present
        .iter()
        .filter(|name| aggregate::lookup(name).is_none())
        .collect();
    if !extra.is_empty() {
        println!("  {} {}", "Not in catalog:".bright_yellow(), extra.len());
        for name in extra {
            println!("    {}", name);
        }
    }
    Ok(CommandOutcome::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{AccidentRow, write_accidents_csv};
    use clap::Parser;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_then_show_and_list() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_accidents_csv(
            &temp_dir,
            &[
                AccidentRow::new("A-1", "2", "CA", "2020-01-01 10:00:00"),
                AccidentRow::new("A-2", "4", "NV", "2020-04-01 11:00:00"),
            ],
        );
        let output = temp_dir.path().join("analytics");
        let input_arg = input.to_string_lossy().to_string();
        let output_arg = output.to_string_lossy().to_string();

        let build = Args::try_parse_from([
            "accidents-processor",
            "-q",
            "build",
            "--input",
            &input_arg,
            "--output",
            &output_arg,
            "--tables",
            "state_counts,severity_counts",
        ])
        .unwrap();
        assert_eq!(run(build).await.unwrap(), CommandOutcome::Success);

        let show = Args::try_parse_from([
            "accidents-processor",
            "-q",
            "show",
            "state_counts",
            "--output",
            &output_arg,
        ])
        .unwrap();
        assert_eq!(run(show).await.unwrap(), CommandOutcome::Success);

        let list =
            Args::try_parse_from(["accidents-processor", "-q", "list", "--output", &output_arg])
                .unwrap();
        assert_eq!(run(list).await.unwrap(), CommandOutcome::Success);
    }

    #[tokio::test]
    async fn test_show_unknown_table_fails() {
        let temp_dir = TempDir::new().unwrap();
        let output_arg = temp_dir.path().to_string_lossy().to_string();
        let show = Args::try_parse_from([
            "accidents-processor",
            "-q",
            "show",
            "not_a_table",
            "--output",
            &output_arg,
        ])
        .unwrap();
        assert!(run(show).await.is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CommandOutcome::Success.exit_code(), 0);
        assert_eq!(CommandOutcome::PartialFailure { failed: 3 }.exit_code(), 2);
    }
}
