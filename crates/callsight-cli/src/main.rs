mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use callsight::sanitize::redact_path;
use callsight::{load_config, AnalyticsEngine, CallBatch, EngineConfig};

#[derive(Parser)]
#[command(name = "callsight", version, about = "Call-center analytics over exported call records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the full dashboard report for a batch file
    Analyze {
        /// JSON file: an array of records or { records, summary, dateRange }
        batch: PathBuf,
        /// Engine config (JSON or YAML); defaults to the user config dir
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print compact JSON instead of pretty JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print only the call summary for a batch file
    Summary {
        batch: PathBuf,
        #[arg(long)]
        compact: bool,
    },
    /// Load and validate an engine config
    ValidateConfig { path: PathBuf },
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("callsight").join("config.json"))
}

fn resolve_config(explicit: Option<&Path>) -> callsight::Result<EngineConfig> {
    if let Some(path) = explicit {
        info!("Using config {}", redact_path(path));
        return Ok(load_config(path)?);
    }

    match default_config_path().filter(|p| p.is_file()) {
        Some(path) => {
            info!("Using config {}", redact_path(&path));
            Ok(load_config(&path)?)
        }
        None => {
            info!("No config file found, using built-in defaults");
            Ok(EngineConfig::default())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<(), serde_json::Error> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", rendered);
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Analyze {
            batch,
            config,
            compact,
        } => {
            let config = resolve_config(config.as_deref())?;
            let batch = CallBatch::from_path(&batch).map_err(callsight::CallsightError::from)?;
            let report = AnalyticsEngine::from_config(&config).run(&batch);
            print_json(&report, compact)?;
        }
        Command::Summary { batch, compact } => {
            let batch = CallBatch::from_path(&batch).map_err(callsight::CallsightError::from)?;
            print_json(&callsight::summarize(&batch.records), compact)?;
        }
        Command::ValidateConfig { path } => {
            let config = load_config(&path).map_err(callsight::CallsightError::from)?;
            info!(
                "{} is valid: {} topic rules, excerpt limit {}",
                redact_path(&path),
                config.topics.len(),
                config.excerpts.limit
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting callsight v{}", env!("CARGO_PKG_VERSION"));

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
