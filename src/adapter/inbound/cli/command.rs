//! Command-line interface definitions.
//!
//! Defines the CLI structure for lydwatch using `clap`: the long-running
//! service plus one-shot commands for parsing, syncing and analysis.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Libyan dinar rate monitor
#[derive(Parser, Debug)]
#[command(name = "lydwatch")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run ingestion, sync and the live server until interrupted
    Run,

    /// Parse one message and print the extracted tick as JSON
    Parse(ParseArgs),

    /// Reconcile daily bars with the rate API
    Sync(SyncArgs),

    /// Print a full analysis for a pair as JSON
    Signal(SignalArgs),

    /// Validate the configuration file
    CheckConfig,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Message text
    pub text: String,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(Args, Debug)]
pub struct SignalArgs {
    /// Currency pair, e.g. USD/LYD
    #[arg(long, default_value = "USD/LYD")]
    pub pair: String,
}
