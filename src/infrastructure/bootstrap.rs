//! Infrastructure bootstrap helpers for runtime wiring.
//!
//! Builds the shared services from a [`Config`]. Every long-lived
//! component receives its collaborators here; nothing is global.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::clock::SystemClock;
use crate::adapter::outbound::forecast::LinearTrendForecaster;
use crate::adapter::outbound::llm::OpenAi;
use crate::adapter::outbound::narrative::LlmNarrator;
use crate::adapter::outbound::rates::{HttpRateSource, SyntheticRateSource};
use crate::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteStore};
use crate::application::analysis::AnalysisService;
use crate::application::broadcast::BroadcastHub;
use crate::application::indicator::IndicatorEngine;
use crate::application::sync::SyncScheduler;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::narrative::Narrator;
use crate::port::outbound::store::Storage;

/// Shared services built once per process.
#[derive(Clone)]
pub struct Services {
    pub storage: Arc<dyn Storage>,
    pub clock: Arc<dyn Clock>,
    pub hub: Arc<BroadcastHub>,
    pub analysis: Arc<AnalysisService>,
    pub scheduler: Arc<SyncScheduler>,
}

/// Open the SQLite database and apply pending migrations.
///
/// # Errors
///
/// Returns an error if the pool cannot be created or migrations fail.
pub fn open_storage(config: &Config) -> Result<Arc<SqliteStore>> {
    let pool = create_pool(&config.database)?;
    run_migrations(&pool)?;
    info!(database = %config.database, "Database ready");
    Ok(Arc::new(SqliteStore::new(pool)))
}

/// Narrator backed by OpenAI, or `None` when no API key is set.
pub fn build_narrator(config: &Config) -> Option<Arc<dyn Narrator>> {
    match OpenAi::from_env(
        config.llm.model.clone(),
        config.llm.max_tokens,
        config.llm.temperature,
    ) {
        Ok(client) => {
            info!(model = %config.llm.model, "Narrative model enabled");
            Some(Arc::new(LlmNarrator::new(Arc::new(client))))
        }
        Err(_) => {
            warn!("OPENAI_API_KEY not set, using templated narratives");
            None
        }
    }
}

/// Sync scheduler over the configured rate API.
///
/// The synthetic fallback is attached only when `allow_synthetic` is set.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the pair list
/// is invalid.
pub fn build_scheduler(
    config: &Config,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
) -> Result<SyncScheduler> {
    let source = HttpRateSource::new(config.sync.api_url.clone(), config.sync.timeout())?;
    let mut scheduler = SyncScheduler::new(storage, Arc::new(source), clock, config.sync.settings()?);
    if config.sync.allow_synthetic {
        warn!("Synthetic fallback enabled; bars will be generated when the rate API fails");
        scheduler = scheduler.with_fallback(Arc::new(SyntheticRateSource::new()));
    }
    Ok(scheduler)
}

/// Analysis service with the linear forecaster and optional narrator.
pub fn build_analysis(
    config: &Config,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    hub: Arc<BroadcastHub>,
) -> AnalysisService {
    let indicators = IndicatorEngine::new(
        Arc::clone(&storage),
        Arc::clone(&clock),
        config.analysis.indicator_settings(),
    );
    let service = AnalysisService::new(
        storage,
        clock,
        hub,
        indicators,
        Arc::new(LinearTrendForecaster::new()),
        config.analysis.analysis_settings(),
    );
    match build_narrator(config) {
        Some(narrator) => service.with_narrator(narrator),
        None => service,
    }
}

/// Build every shared service from configuration.
///
/// # Errors
///
/// Returns an error if storage or the rate client cannot be set up.
pub fn build(config: &Config) -> Result<Services> {
    let storage: Arc<dyn Storage> = open_storage(config)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let hub = Arc::new(BroadcastHub::new());

    let analysis = build_analysis(config, Arc::clone(&storage), Arc::clone(&clock), Arc::clone(&hub));
    let scheduler = build_scheduler(config, Arc::clone(&storage), Arc::clone(&clock))?;

    Ok(Services {
        storage,
        clock,
        hub,
        analysis: Arc::new(analysis),
        scheduler: Arc::new(scheduler),
    })
}
