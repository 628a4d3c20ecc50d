mod cli;
mod error;
mod manager;
mod menu;
mod models;
mod storage;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::CommandLine;
use manager::StudentManager;
use std::io;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: CommandLine) -> Result<bool> {
    let mut manager = StudentManager::open(&args.file)
        .with_context(|| format!("could not open roster {}", args.file.display()))?;
    let ok = cli::session(&mut manager, args.command, io::stdin().lock(), io::stdout().lock())?;
    debug!(students = manager.len(), "session finished");
    Ok(ok)
}

fn main() -> ExitCode {
    init_tracing();
    let args = CommandLine::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
