//! CLI module graph.

pub mod command;
pub mod config;
pub mod output;
pub mod parse;
pub mod run;
pub mod signal;
pub mod sync;

use command::{Cli, Commands};

use crate::error::Result;

/// Dispatch a parsed command line to its handler.
///
/// # Errors
///
/// Returns the handler's error.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run => run::execute(&cli.config).await,
        Commands::Parse(args) => parse::execute(&args.text),
        Commands::Sync(args) => sync::execute(&cli.config, args.once).await,
        Commands::Signal(args) => signal::execute(&cli.config, &args.pair).await,
        Commands::CheckConfig => config::execute_check(&cli.config),
    }
}
