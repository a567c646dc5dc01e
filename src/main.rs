use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pacer::config::load_config;
use pacer::observability::logging::init_logging;
use pacer::replay::run_scenario;

#[derive(Parser)]
#[command(name = "pacer")]
#[command(about = "Replay call traces through debounce and throttle wrappers", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario in real time and print the report as JSON
    Replay {
        scenario: PathBuf,

        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Load and validate a scenario without running it
    Check { scenario: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Replay { scenario, compact } => {
            let config = load_config(&scenario)?;
            let report = run_scenario(&config).await?;
            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{}", json);
        }
        Commands::Check { scenario } => {
            let config = load_config(&scenario)?;
            tracing::info!(
                path = ?scenario,
                kind = %config.wrapper.kind,
                calls = config.calls.len(),
                "Scenario is valid"
            );
            println!("ok");
        }
    }

    Ok(())
}
