//! simfs CLI Binary
//!
//! Runs shell-style commands against a seeded in-memory filesystem.

use anyhow::Context;
use clap::Parser;
use simfs::logging::init_logging;
use simfs::tooling::cli::{Cli, CliContext};
use std::io;
use std::process;

fn main() {
    match run() {
        Ok(status) => process::exit(status),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();
    let config = cli.config().context("failed to load configuration")?;
    init_logging(&config.logging).context("failed to initialize logging")?;

    let mut context = CliContext::new(&config).context("failed to build filesystem")?;
    let stdin = io::stdin();
    let status = context.execute(
        &cli.command(),
        stdin.lock(),
        &mut io::stdout(),
        &mut io::stderr(),
    )?;
    Ok(status)
}
