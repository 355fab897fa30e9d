//! Periodic daily-bar synchronisation from the historical rate source.
//!
//! Each cycle syncs every configured pair independently and incrementally:
//! only dates after the newest authoritative bar are requested. A failed
//! fetch falls back to the degraded source when one is configured, and the
//! outcome says so explicitly. Real bars replace synthetic ones once the
//! source recovers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, TimeDelta};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::domain::{CurrencyPair, DailyBar};
use crate::error::Result;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::rates::RateSource;
use crate::port::outbound::store::Storage;

/// Scheduler settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    pub pairs: Vec<CurrencyPair>,
    pub interval: Duration,
    /// Days requested for a pair with no stored bars.
    pub lookback_days: i64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            pairs: vec![CurrencyPair::usd_lyd(), CurrencyPair::eur_lyd()],
            interval: Duration::from_secs(24 * 3600),
            lookback_days: 30,
        }
    }
}

/// Bars returned by a fetch, tagged with where they came from.
#[derive(Debug, Clone, PartialEq)]
pub enum BarBatch {
    /// From the authoritative source.
    Fetched(Vec<DailyBar>),
    /// From the degraded fallback. Never authoritative.
    Synthetic(Vec<DailyBar>),
}

impl BarBatch {
    pub const fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }

    pub fn into_bars(self) -> Vec<DailyBar> {
        match self {
            Self::Fetched(bars) | Self::Synthetic(bars) => bars,
        }
    }
}

/// What one pair's sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Newest stored bar is already today's.
    UpToDate,
    /// Bars came from the authoritative source.
    Fetched { stored: usize },
    /// The source failed and fallback bars were stored.
    Degraded { stored: usize },
    /// The cycle failed for this pair; retried next interval.
    Failed { reason: String },
}

/// Background task keeping daily bars current.
pub struct SyncScheduler {
    storage: Arc<dyn Storage>,
    source: Arc<dyn RateSource>,
    fallback: Option<Arc<dyn RateSource>>,
    clock: Arc<dyn Clock>,
    settings: SyncSettings,
}

impl SyncScheduler {
    pub fn new(
        storage: Arc<dyn Storage>,
        source: Arc<dyn RateSource>,
        clock: Arc<dyn Clock>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            storage,
            source,
            fallback: None,
            clock,
            settings,
        }
    }

    /// Use `fallback` when the primary source fails.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn RateSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Run one cycle now, then one per interval, until shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            pairs = self.settings.pairs.len(),
            interval_secs = self.settings.interval.as_secs(),
            source = self.source.name(),
            "Sync scheduler started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            info!("Starting periodic sync");
            self.sync_once().await;
            info!("Periodic sync completed");

            tokio::select! {
                _ = self.clock.sleep(self.settings.interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        info!("Sync scheduler stopped");
    }

    /// Sync every configured pair once. Errors are logged per pair.
    pub async fn sync_once(&self) -> Vec<(CurrencyPair, SyncOutcome)> {
        let mut outcomes = Vec::with_capacity(self.settings.pairs.len());
        for pair in &self.settings.pairs {
            let outcome = match self.sync_pair(pair).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(pair = %pair, error = %e, "Error syncing pair");
                    SyncOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push((pair.clone(), outcome));
        }
        outcomes
    }

    /// Sync one pair from the day after its newest authoritative bar through
    /// today. Dates covered only by synthetic bars are requested again.
    pub async fn sync_pair(&self, pair: &CurrencyPair) -> Result<SyncOutcome> {
        let today = self.clock.now().date_naive();
        let start = match self.storage.latest_bar_date(pair).await? {
            Some(last) => last + TimeDelta::days(1),
            None => today - TimeDelta::days(self.settings.lookback_days),
        };

        if start > today {
            info!(pair = %pair, "Pair is up to date");
            return Ok(SyncOutcome::UpToDate);
        }

        let batch = self.fetch(pair, start, today).await?;
        let degraded = batch.is_synthetic();

        // Sources may return overlapping ranges; keep only the requested dates.
        let bars: Vec<DailyBar> = batch
            .into_bars()
            .into_iter()
            .filter(|bar| bar.pair == *pair && bar.date >= start && bar.date <= today)
            .collect();

        if bars.is_empty() {
            warn!(pair = %pair, %start, end = %today, "No data fetched");
        }

        let stored = self.storage.append_bars(&bars).await?;
        info!(pair = %pair, stored, degraded, "Saved daily bars");

        Ok(if degraded {
            SyncOutcome::Degraded { stored }
        } else {
            SyncOutcome::Fetched { stored }
        })
    }

    /// Fetch from the primary source, falling back when allowed.
    pub async fn fetch(
        &self,
        pair: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarBatch> {
        info!(pair = %pair, %start, %end, source = self.source.name(), "Fetching rates");

        match self.source.fetch_bars(pair, start, end).await {
            Ok(bars) => Ok(BarBatch::Fetched(bars)),
            Err(e) => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        pair = %pair,
                        error = %e,
                        fallback = fallback.name(),
                        "Rate source failed, using degraded fallback"
                    );
                    Ok(BarBatch::Synthetic(fallback.fetch_bars(pair, start, end).await?))
                }
                None => Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::adapter::outbound::clock::ManualClock;
    use crate::adapter::outbound::memory::MemoryStore;
    use crate::adapter::outbound::rates::SyntheticRateSource;
    use crate::domain::SOURCE_FULUS;
    use crate::error::Error;
    use crate::port::outbound::store::BarStore;

    /// Returns one flat bar per requested day and records each request.
    #[derive(Default)]
    struct Recorded {
        requests: Mutex<Vec<(NaiveDate, NaiveDate)>>,
        fail: bool,
    }

    #[async_trait]
    impl RateSource for Recorded {
        async fn fetch_bars(
            &self,
            pair: &CurrencyPair,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<DailyBar>> {
            self.requests.lock().push((start, end));
            if self.fail {
                return Err(Error::Connection("unreachable".into()));
            }
            Ok(start
                .iter_days()
                .take_while(|d| *d <= end)
                .map(|date| {
                    DailyBar::try_new(date, pair.clone(), 7.0, 7.1, 6.9, 7.0, Some(1000.0), SOURCE_FULUS)
                        .unwrap()
                })
                .collect())
        }

        fn name(&self) -> &'static str {
            "recorded"
        }
    }

    fn scheduler(
        source: Arc<Recorded>,
        fallback: bool,
    ) -> (Arc<MemoryStore>, Arc<ManualClock>, SyncScheduler) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::default());
        let settings = SyncSettings {
            pairs: vec![CurrencyPair::usd_lyd()],
            ..SyncSettings::default()
        };
        let mut scheduler = SyncScheduler::new(store.clone(), source, clock.clone(), settings);
        if fallback {
            scheduler = scheduler.with_fallback(Arc::new(SyntheticRateSource::new()));
        }
        (store, clock, scheduler)
    }

    #[tokio::test]
    async fn first_run_fetches_lookback_then_only_new_days() {
        let source = Arc::new(Recorded::default());
        let (store, clock, scheduler) = scheduler(source.clone(), false);
        let pair = CurrencyPair::usd_lyd();
        let today = clock.now().date_naive();

        let outcomes = scheduler.sync_once().await;
        assert_eq!(outcomes[0].1, SyncOutcome::Fetched { stored: 31 });
        assert_eq!(
            source.requests.lock().clone(),
            vec![(today - TimeDelta::days(30), today)]
        );

        clock.advance(Duration::from_secs(24 * 3600));
        let tomorrow = today + TimeDelta::days(1);
        let outcomes = scheduler.sync_once().await;
        assert_eq!(outcomes[0].1, SyncOutcome::Fetched { stored: 1 });
        assert_eq!(source.requests.lock()[1], (tomorrow, tomorrow));

        let bars = store
            .bars_between(&pair, today - TimeDelta::days(60), tomorrow)
            .await
            .unwrap();
        assert_eq!(bars.len(), 32);
        let mut dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
        dates.dedup();
        assert_eq!(dates.len(), 32);
    }

    #[tokio::test]
    async fn same_day_rerun_is_up_to_date() {
        let source = Arc::new(Recorded::default());
        let (_store, _clock, scheduler) = scheduler(source.clone(), false);

        scheduler.sync_once().await;
        let outcomes = scheduler.sync_once().await;

        assert_eq!(outcomes[0].1, SyncOutcome::UpToDate);
        assert_eq!(source.requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn failure_without_fallback_stores_nothing() {
        let source = Arc::new(Recorded {
            fail: true,
            ..Recorded::default()
        });
        let (store, _clock, scheduler) = scheduler(source, false);

        let outcomes = scheduler.sync_once().await;

        assert!(matches!(outcomes[0].1, SyncOutcome::Failed { .. }));
        let latest = store.latest_bar_date(&CurrencyPair::usd_lyd()).await.unwrap();
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn failure_with_fallback_is_reported_degraded() {
        let source = Arc::new(Recorded {
            fail: true,
            ..Recorded::default()
        });
        let (store, clock, scheduler) = scheduler(source, true);
        let today = clock.now().date_naive();

        let outcomes = scheduler.sync_once().await;

        assert_eq!(outcomes[0].1, SyncOutcome::Degraded { stored: 31 });
        let bars = store
            .bars_between(&CurrencyPair::usd_lyd(), today - TimeDelta::days(30), today)
            .await
            .unwrap();
        assert!(bars.iter().all(DailyBar::is_synthetic));
    }

    #[tokio::test]
    async fn run_repeats_until_shutdown() {
        let source = Arc::new(Recorded::default());
        let (_store, clock, scheduler) = scheduler(source.clone(), false);
        let scheduler = Arc::new(scheduler);
        let (tx, rx) = watch::channel(false);

        let task = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run(rx).await })
        };
        while source.requests.lock().len() < 3 {
            tokio::task::yield_now().await;
        }
        tx.send(true).unwrap();
        task.await.unwrap();

        // One immediate cycle, then one per interval; each later cycle asks for one day.
        let requests = source.requests.lock().clone();
        assert!(requests.len() >= 3);
        assert_eq!(requests[1].0, requests[1].1);
        assert!(clock.sleeps().iter().all(|d| *d == Duration::from_secs(24 * 3600)));
    }
}
