//! VCR Engine - Command-line tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vcr_tools::{batch, report, scenario::Scenario, validate};

#[derive(Parser)]
#[command(name = "vcr-tools")]
#[command(about = "Play, batch-run and validate recorded battles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one scenario and print its report as JSON
    Run {
        /// Path to scenario file
        path: PathBuf,
        /// Include the tick-by-tick event log
        #[arg(long)]
        events: bool,
    },
    /// Play every scenario in a directory in parallel
    Batch {
        /// Directory of scenario files
        #[arg(default_value = "crates/vcr_tools/scenarios")]
        dir: PathBuf,
        /// Where to write the JSON results
        #[arg(short, long, default_value = "results/batch.json")]
        output: PathBuf,
    },
    /// Check that scenarios load and are playable
    Validate {
        /// Scenario file or directory
        #[arg(default_value = "crates/vcr_tools/scenarios")]
        path: PathBuf,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { path, events } => {
            let report = Scenario::load(&path).and_then(|s| report::play(&s, events));
            match report.map(|r| serde_json::to_string_pretty(&r)) {
                Ok(Ok(json)) => println!("{json}"),
                Ok(Err(e)) => fail(&format!("Failed to encode report: {e}")),
                Err(e) => fail(&format!("{}: {e}", path.display())),
            }
        }
        Commands::Batch { dir, output } => match batch::run_batch(&dir) {
            Ok(results) => {
                if let Err(e) = results.save(&output) {
                    fail(&format!("Failed to write {}: {e}", output.display()));
                }
                tracing::info!("Results written to {}", output.display());
                if results.summary.failed > 0 {
                    std::process::exit(1);
                }
            }
            Err(e) => fail(&format!("Failed to read {}: {e}", dir.display())),
        },
        Commands::Validate { path } => {
            tracing::info!("Validating scenarios in: {}", path.display());
            let results = match validate::validate_path(&path) {
                Ok(results) => results,
                Err(e) => fail(&format!("Failed to read {}: {e}", path.display())),
            };
            let mut failed = false;
            for (file, result) in results {
                match result {
                    Ok(playability) => {
                        tracing::info!("{}: {}", file.display(), playability.describe());
                    }
                    Err(e) => {
                        tracing::error!("{}: {e}", file.display());
                        failed = true;
                    }
                }
            }
            if failed {
                std::process::exit(1);
            }
            tracing::info!("Validation passed");
        }
    }
}

fn fail(message: &str) -> ! {
    tracing::error!("{message}");
    std::process::exit(1);
}
