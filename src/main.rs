use accidents_processor::AccidentsError;
use accidents_processor::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        // Tables are written atomically, so abandoning the run leaves no partial files
        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(AccidentsError::Interrupted {
                    reason: "processing interrupted by user".to_string(),
                }
                .into())
            }
        }
    });

    match result {
        Ok(outcome) => {
            if let commands::CommandOutcome::PartialFailure { failed } = outcome {
                eprintln!("{} summary table(s) failed to build", failed);
            }
            process::exit(outcome.exit_code());
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
