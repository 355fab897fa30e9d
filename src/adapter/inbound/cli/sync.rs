//! Handler for the `sync` command.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::watch;
use tracing::info;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::clock::SystemClock;
use crate::application::sync::SyncOutcome;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::store::Storage;

fn describe(outcome: &SyncOutcome) -> serde_json::Value {
    match outcome {
        SyncOutcome::UpToDate => json!({ "status": "up_to_date" }),
        SyncOutcome::Fetched { stored } => json!({ "status": "fetched", "stored": stored }),
        SyncOutcome::Degraded { stored } => json!({ "status": "synthetic", "stored": stored }),
        SyncOutcome::Failed { reason } => json!({ "status": "failed", "reason": reason }),
    }
}

/// Run one sync cycle, or the scheduler until Ctrl-C.
pub async fn execute(path: &Path, once: bool) -> Result<()> {
    let config = Config::load(path)?;
    config.init_logging();

    let storage: Arc<dyn Storage> = bootstrap::open_storage(&config)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let scheduler = bootstrap::build_scheduler(&config, storage, clock)?;

    if once {
        let outcomes = scheduler.sync_once().await;
        let report: serde_json::Map<String, serde_json::Value> = outcomes
            .iter()
            .map(|(pair, outcome)| (pair.to_string(), describe(outcome)))
            .collect();
        return output::json(&report);
    }

    let (stop, shutdown) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = stop.send(true);
        }
    });
    scheduler.run(shutdown).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_are_labelled() {
        assert_eq!(describe(&SyncOutcome::UpToDate)["status"], "up_to_date");
        assert_eq!(describe(&SyncOutcome::Degraded { stored: 3 })["status"], "synthetic");
        assert_eq!(describe(&SyncOutcome::Fetched { stored: 3 })["stored"], 3);
    }
}
