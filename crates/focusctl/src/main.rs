#![warn(missing_docs)]

//! Entry point for the `focusctl` binary.

mod cli;
mod error;
mod scenario;

use std::{fs, process};

use clap::Parser;
use gamefocus::FocusConfig;
use tracing::{error, info};

use crate::{
    cli::{Cli, Commands, ConfigArgs, ReplayArgs},
    error::Result,
    scenario::Scenario,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let Cli { log, command } = Cli::parse();
    logging::init(&log);

    match command {
        Commands::Replay(args) => replay(&args),
        Commands::Config(args) => show_config(&args),
    }
}

/// Replay a scenario file and print what happened.
fn replay(args: &ReplayArgs) -> Result<()> {
    let scenario = Scenario::from_ron_str(&fs::read_to_string(&args.scenario)?)?;
    let config = match &args.config {
        Some(path) => FocusConfig::load(path)?,
        None => scenario.config(),
    };
    info!(
        path = %args.scenario.display(),
        steps = scenario.steps.len(),
        initial = config.initial_focus,
        "replay_start"
    );
    let result = scenario::replay(&scenario, &config)?;
    for entry in &result.entries {
        println!("{entry}");
    }
    println!(
        "final: desired={} actual={} transitions={} commands={}",
        result.final_state.desired,
        result.final_state.actual,
        result.changes().len(),
        result.commands()
    );
    Ok(())
}

/// Print a parsed configuration.
fn show_config(args: &ConfigArgs) -> Result<()> {
    let config = FocusConfig::load(&args.path)?;
    println!("initial_focus: {}", config.initial_focus);
    println!("exit_key: {}", config.exit_key);
    Ok(())
}
