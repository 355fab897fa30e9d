//! Handler for the `signal` command.

use std::path::Path;
use std::sync::Arc;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::clock::SystemClock;
use crate::application::broadcast::BroadcastHub;
use crate::domain::CurrencyPair;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::store::Storage;

/// Analyse `pair` from stored data and print the result.
pub async fn execute(path: &Path, pair: &str) -> Result<()> {
    let config = Config::load(path)?;
    config.init_logging();
    let pair = CurrencyPair::try_new(pair)?;

    let storage: Arc<dyn Storage> = bootstrap::open_storage(&config)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let analysis = bootstrap::build_analysis(&config, storage, clock, Arc::new(BroadcastHub::new()));

    output::json(&analysis.analyze(&pair).await?)
}
