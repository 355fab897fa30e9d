//! Handler for the `run` command.

use std::path::Path;

use tokio::sync::watch;
use tracing::info;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::runtime;

/// Run the service until Ctrl-C.
pub async fn execute(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    config.init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "lydwatch starting");

    let (stop, shutdown) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = stop.send(true);
        }
    });

    runtime::run_with_shutdown(config, shutdown).await
}
