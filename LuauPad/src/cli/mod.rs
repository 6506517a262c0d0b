//! `LuauPad` CLI - highlight, dispatch and edit Luau scripts from a terminal

pub mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use commands::Commands;
use tracing::Level;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "luaupad")]
#[command(about = "LuauPad: a multi-document Luau script editor", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/LuauPad/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Run the `LuauPad` CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    cli.command.execute(&config)?;

    Ok(())
}
