//! Handler for the `check-config` command.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Load and validate the configuration, then print its key settings.
pub fn execute_check(path: &Path) -> Result<()> {
    let config = Config::load(path)?;

    output::success(&format!("{} is valid", path.display()));
    output::field("Database", &config.database);
    output::field("Server", &config.server.bind);
    output::field("Channels", config.ingestion.channels.join(", "));
    output::field("Pairs", config.sync.pairs.join(", "));
    output::field("Rate API", &config.sync.api_url);
    output::field("Synthetic", config.sync.allow_synthetic);
    Ok(())
}
