//! Console front end for the game-character record manager.
//!
//! Loads records from one or more CSV files, then runs a single query or an
//! interactive shell against the in-memory store.
//!
//! Run with: `dms --data characters.csv top 5`

mod commands;
mod output;
mod shell;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dms_core::{CharacterStore, DmsConfig};
use tracing_subscriber::EnvFilter;

use commands::{Command, Session};

/// Game character record manager
#[derive(Parser, Debug)]
#[command(name = "dms")]
#[command(about = "Manage, search and rank game-character records", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV files imported before the command runs
    #[arg(long = "data", global = true)]
    data: Vec<PathBuf>,

    /// Print records as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DmsConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DmsConfig::default(),
    };

    setup_logging(&config.general.log_level);

    let mut session = Session::new(CharacterStore::new(), config, cli.json);
    for path in &cli.data {
        session.load(path)?;
    }

    session.run(cli.command)
}

/// Log to stderr; `RUST_LOG` wins over the configured level.
fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
