use flint_recovery::cli::{Cli, Commands};
use flint_recovery::commands::{self, read_input};
use flint_recovery::error::FlintError;
use flint_recovery::logger::{default_log_dir, initialize as LoggerInitialize};

use common::ErrorLocation;
use recovery_core::config::{RecoveryConfig, default_config_dir};

use std::panic::Location;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use serde::Serialize;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = cli.log_dir.clone().unwrap_or_else(default_log_dir);
    if let Err(e) = LoggerInitialize(&log_dir) {
        // Keep going without a log; command output is still useful.
        eprintln!("{e}");
    }
    info!("flint-recovery starting, log directory: {}", log_dir.display());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            match serde_json::to_string_pretty(&e) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), FlintError> {
    match cli.command {
        Commands::Classify(args) => {
            let input = match args.network {
                Some(_) => None,
                None => Some(read_input(args.file.as_deref())?),
            };
            let directive = commands::classify::run(input.as_deref(), args.network.as_deref())?;
            print_json(&directive)
        }
        Commands::Portal(args) => {
            let config = load_config(cli.config_dir)?;
            let url = commands::portal::run(&config, args.reconnect).await?;
            println!("{url}");
            Ok(())
        }
        Commands::Connections(args) => {
            let input = read_input(Some(&args.file))?;
            let reports = commands::connections::run(&input)?;
            print_json(&reports)
        }
    }
}

fn load_config(config_dir: Option<PathBuf>) -> Result<RecoveryConfig, FlintError> {
    let config_dir = config_dir
        .or_else(default_config_dir)
        .ok_or_else(|| FlintError::Flint {
            message: String::from("No config directory available; pass --config-dir"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    RecoveryConfig::load_with_env(&config_dir).map_err(|e| FlintError::Core {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), FlintError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| FlintError::Flint {
        message: format!("Failed to serialize output: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;
    println!("{json}");
    Ok(())
}
