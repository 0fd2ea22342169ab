//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "flint-recovery", version, about = "Classify provider failures and run recovery")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding recovery.toml
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Directory for flint-recovery.log
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the recovery directive for a provider error
    Classify(ClassifyArgs),
    /// Open the registration or reconnect portal
    Portal(PortalArgs),
    /// Report status and directive for each connection
    Connections(ConnectionsArgs),
}

#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// ErrorResponse JSON file (stdin when omitted)
    #[arg(conflicts_with = "network")]
    pub file: Option<PathBuf>,

    /// Classify a transport failure with this message instead
    #[arg(long, value_name = "MESSAGE")]
    pub network: Option<String>,
}

#[derive(Parser, Debug)]
pub struct PortalArgs {
    /// Account to reconnect; registers when omitted
    #[arg(long, value_name = "ID")]
    pub reconnect: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ConnectionsArgs {
    /// JSON array of connection records
    pub file: PathBuf,
}
