//! Long-running service orchestration.
//!
//! Starts the live server, the sync scheduler, the analysis publisher and
//! one ingestion pipeline per monitored channel, then waits for them all
//! to stop after the shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::adapter::inbound::feed::ChannelStream;
use crate::adapter::inbound::websocket::LiveServer;
use crate::application::ingestion::IngestionPipeline;
use crate::application::limiter::RateLimiter;
use crate::error::Result;
use crate::infrastructure::bootstrap::{self, Services};
use crate::infrastructure::config::settings::Config;

/// Spawn one ingestion pipeline per stream.
///
/// Streams get their own limiter unless `shared_limiter` is set.
pub fn spawn_ingestion(
    config: &Config,
    services: &Services,
    streams: Vec<ChannelStream>,
    shutdown: &watch::Receiver<bool>,
    tasks: &mut JoinSet<()>,
) {
    let buffer = config.ingestion.buffer();
    let shared = Arc::new(RateLimiter::new(Arc::clone(&services.clock), buffer));

    for stream in streams {
        let limiter = if config.ingestion.shared_limiter {
            Arc::clone(&shared)
        } else {
            Arc::new(RateLimiter::new(Arc::clone(&services.clock), buffer))
        };
        let pipeline = IngestionPipeline::new(
            Arc::clone(&services.storage),
            Arc::clone(&services.hub),
            limiter,
            Arc::clone(&services.clock),
        );
        let shutdown = shutdown.clone();
        tasks.spawn(async move {
            pipeline.run(stream, shutdown).await;
        });
    }
}

#[cfg(feature = "telegram")]
fn spawn_feed(
    config: &Config,
    services: &Services,
    shutdown: &watch::Receiver<bool>,
    tasks: &mut JoinSet<()>,
) {
    use crate::adapter::inbound::telegram::TelegramFeed;

    match TelegramFeed::from_env(&config.ingestion.channels) {
        Ok((feed, streams)) => {
            info!(channels = streams.len(), "Monitoring channels");
            spawn_ingestion(config, services, streams, shutdown, tasks);
            let shutdown = shutdown.clone();
            tasks.spawn(feed.run(shutdown));
        }
        Err(e) => warn!(error = %e, "Channel feed disabled"),
    }
}

#[cfg(not(feature = "telegram"))]
fn spawn_feed(
    _config: &Config,
    _services: &Services,
    _shutdown: &watch::Receiver<bool>,
    _tasks: &mut JoinSet<()>,
) {
    warn!("Built without the telegram feature, channel feed disabled");
}

/// Run every configured component until `shutdown` flips to true.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or the server address
/// cannot be bound. Component failures after startup are logged.
pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
    let services = bootstrap::build(&config)?;
    let listener = TcpListener::bind(&config.server.bind).await?;
    let mut tasks = JoinSet::new();

    let server = LiveServer::new(Arc::clone(&services.hub), Arc::clone(&services.clock))
        .with_send_timeout(Duration::from_millis(config.server.send_timeout_ms));
    tasks.spawn(server.serve(listener, shutdown.clone()));

    if config.sync.enabled {
        let scheduler = Arc::clone(&services.scheduler);
        let shutdown = shutdown.clone();
        tasks.spawn(async move { scheduler.run(shutdown).await });
    }

    if let Some(interval) = config.analysis.publish_interval() {
        let analysis = Arc::clone(&services.analysis);
        let pairs = services.scheduler.settings().pairs.clone();
        let shutdown = shutdown.clone();
        tasks.spawn(async move { analysis.run_publisher(&pairs, interval, shutdown).await });
    }

    if config.ingestion.enabled {
        spawn_feed(&config, &services, &shutdown, &mut tasks);
    }

    info!(bind = %config.server.bind, "lydwatch running");

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Task ended abnormally");
        }
    }

    info!("lydwatch stopped");
    Ok(())
}
