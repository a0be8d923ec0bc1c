//! Command-line interface definitions for focusctl.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `focusctl` binary.
#[derive(Parser, Debug)]
#[command(
    name = "focusctl",
    about = "Replay host events through the game-focus coordinator",
    version
)]
pub struct Cli {
    /// Logging controls shared across binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a RON scenario and print every transition and command.
    Replay(ReplayArgs),
    /// Parse a coordinator configuration file and print the result.
    Config(ConfigArgs),
}

/// Arguments for the `replay` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Scenario file in RON syntax.
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Optional coordinator configuration (RON); overrides the scenario's
    /// initial state and exit key.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `config` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Configuration file in RON syntax.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}
