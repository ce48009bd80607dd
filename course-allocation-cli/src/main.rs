mod cli;
mod commands;
mod error;
mod gate;
mod store;
mod telemetry;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use course_allocation_config::get_config;
use tracing::debug;

use crate::cli::Cli;
use crate::error::AppError;
use crate::gate::AccessGate;
use crate::telemetry::setup_logging;

fn run(cli: Cli) -> Result<(), AppError> {
    let config = get_config()?;
    setup_logging(&config.log_filter);
    debug!(?config, "loaded config");

    let gate = AccessGate::new(config.access_secrets.clone());
    gate.verify(&cli.secret)?;

    let path = cli.roster.unwrap_or_else(|| config.roster_path.clone());
    let mut roster = store::load(&path)?;
    let mutates = cli.command.mutates();

    commands::execute(cli.command, &mut roster, &config, &mut io::stdout().lock())?;

    if mutates {
        store::save(&path, &roster)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
