#![forbid(unsafe_code)]

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;

use crate::config::{init_tracing, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = cli.hal_config()?;
    tracing::debug!(?config, "loaded video port settings");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&cli.command, &config, &mut out)
}
