//! On-demand market analysis and the read paths behind it.
//!
//! Combines current price, forecasts, indicators, the signal, recent
//! message excerpts and a narrative. Forecast and narrative failures
//! degrade to an empty forecast and the templated sentence.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::application::broadcast::BroadcastHub;
use crate::application::indicator::IndicatorEngine;
use crate::application::signal;
use crate::domain::{
    CurrencyPair, DailyBar, ForecastPoint, ForecastTrend, MarketAnalysis, MessageExcerpt,
    SignalResult, TickRecord,
};
use crate::error::Result;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::forecast::Forecaster;
use crate::port::outbound::narrative::{NarrativeContext, Narrator};
use crate::port::outbound::store::Storage;

/// Analysis settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Messages included as excerpts.
    pub recent_messages: usize,
    /// Days of history used to train the forecaster.
    pub forecast_days: i64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            recent_messages: 10,
            forecast_days: 30,
        }
    }
}

pub struct AnalysisService {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    hub: Arc<BroadcastHub>,
    indicators: IndicatorEngine,
    forecaster: Arc<dyn Forecaster>,
    narrator: Option<Arc<dyn Narrator>>,
    settings: AnalysisSettings,
}

impl AnalysisService {
    pub fn new(
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        hub: Arc<BroadcastHub>,
        indicators: IndicatorEngine,
        forecaster: Arc<dyn Forecaster>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            storage,
            clock,
            hub,
            indicators,
            forecaster,
            narrator: None,
            settings,
        }
    }

    #[must_use]
    pub fn with_narrator(mut self, narrator: Arc<dyn Narrator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    /// Price of the most recent tick.
    pub async fn current_price(&self, pair: &CurrencyPair) -> Result<Option<f64>> {
        let latest = self.storage.latest_ticks(pair, 1).await?;
        Ok(latest.first().map(|t| t.price))
    }

    pub async fn panic_index(&self) -> Result<f64> {
        self.indicators.panic_index().await
    }

    /// Signal from RSI and panic alone, with a neutral forecast.
    pub async fn signal(&self, pair: &CurrencyPair) -> Result<SignalResult> {
        let rsi = self.indicators.rsi(pair).await?;
        let panic = self.indicators.panic_index().await?;
        Ok(signal::generate(rsi, panic, ForecastTrend::Neutral))
    }

    /// Daily bars for the trailing `days`, oldest first.
    pub async fn daily_window(&self, pair: &CurrencyPair, days: i64) -> Result<Vec<DailyBar>> {
        let today = self.clock.now().date_naive();
        self.storage
            .bars_between(pair, today - TimeDelta::days(days), today)
            .await
    }

    /// Ticks for the trailing `hours`, oldest first.
    pub async fn tick_window(&self, pair: &CurrencyPair, hours: i64) -> Result<Vec<TickRecord>> {
        let now = self.clock.now();
        self.storage
            .ticks_between(pair, now - TimeDelta::hours(hours), now)
            .await
    }

    /// Newest messages first, truncated for display.
    pub async fn recent_messages(&self, limit: usize) -> Result<Vec<MessageExcerpt>> {
        let messages = self.storage.recent_messages(None, limit).await?;
        Ok(messages.iter().map(|m| m.excerpt()).collect())
    }

    /// Hourly forecast for the next `hours`. Empty on too little history
    /// or forecaster failure.
    pub async fn forecast(&self, pair: &CurrencyPair, hours: usize) -> Result<Vec<ForecastPoint>> {
        let series = self.training_series(pair).await?;
        if series.len() < 2 {
            debug!(pair = %pair, samples = series.len(), "Insufficient data for forecast");
            return Ok(Vec::new());
        }

        match self.forecaster.forecast(&series, hours).await {
            Ok(points) => Ok(points),
            Err(e) => {
                warn!(pair = %pair, model = self.forecaster.name(), error = %e, "Forecast failed");
                Ok(Vec::new())
            }
        }
    }

    /// Full analysis for one pair.
    pub async fn analyze(&self, pair: &CurrencyPair) -> Result<MarketAnalysis> {
        let current_price = match self.current_price(pair).await? {
            Some(price) => price,
            None => {
                warn!(pair = %pair, "No current price data");
                0.0
            }
        };

        let forecast_24h = self.forecast(pair, 24).await?;
        let forecast_48h = self.forecast(pair, 48).await?;
        let trend = ForecastTrend::from_points(&forecast_24h);

        let rsi = self.indicators.rsi(pair).await?;
        let panic = self.indicators.panic_index().await?;
        let signal = signal::generate(rsi, panic, trend);

        let recent_messages = self.recent_messages(self.settings.recent_messages).await?;

        let context = NarrativeContext {
            pair: pair.clone(),
            current_price,
            rsi: signal.rsi,
            panic_index: signal.panic_index,
            signal: signal.signal,
            confidence: signal.confidence,
            excerpts: recent_messages.clone(),
        };
        let narrative = self.narrate(&context).await;

        info!(
            pair = %pair,
            signal = %signal.signal,
            confidence = signal.confidence,
            rsi = signal.rsi,
            panic = signal.panic_index,
            "Analysis complete"
        );

        Ok(MarketAnalysis {
            current_price,
            pair: pair.clone(),
            forecast_24h,
            forecast_48h,
            signal,
            recent_messages,
            narrative,
        })
    }

    /// Analyze and push the result to live subscribers.
    pub async fn analyze_and_publish(&self, pair: &CurrencyPair) -> Result<MarketAnalysis> {
        let analysis = self.analyze(pair).await?;
        if let Err(e) = self.hub.publish_analysis(analysis.clone()).await {
            warn!(pair = %pair, error = %e, "Failed to publish analysis update");
        }
        Ok(analysis)
    }

    /// Publish an analysis for every pair once per `interval` until shutdown.
    ///
    /// A failed analysis is logged and retried on the next tick.
    pub async fn run_publisher(
        &self,
        pairs: &[CurrencyPair],
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(pairs = pairs.len(), interval_secs = interval.as_secs(), "Analysis publisher started");
        loop {
            tokio::select! {
                _ = self.clock.sleep(interval) => {}
                _ = shutdown.changed() => break,
            }
            if *shutdown.borrow() {
                break;
            }
            for pair in pairs {
                if let Err(e) = self.analyze_and_publish(pair).await {
                    warn!(pair = %pair, error = %e, "Scheduled analysis failed");
                }
            }
        }
        info!("Analysis publisher stopped");
    }

    async fn narrate(&self, context: &NarrativeContext) -> String {
        let Some(narrator) = &self.narrator else {
            return context.templated();
        };
        match narrator.narrate(context).await {
            Ok(text) => text,
            Err(e) => {
                warn!(pair = %context.pair, error = %e, "Narrative unavailable, using template");
                context.templated()
            }
        }
    }

    /// Daily closes of authoritative bars, or daily mean tick prices when
    /// none are stored. Synthetic bars never train the forecast.
    async fn training_series(&self, pair: &CurrencyPair) -> Result<Vec<(DateTime<Utc>, f64)>> {
        let bars = self.daily_window(pair, self.settings.forecast_days).await?;
        let closes: Vec<(DateTime<Utc>, f64)> = bars
            .iter()
            .filter(|bar| !bar.is_synthetic())
            .map(|bar| (midnight(bar.date), bar.close))
            .collect();
        if !closes.is_empty() {
            return Ok(closes);
        }

        debug!(pair = %pair, synthetic = bars.len(), "No authoritative daily bars, using tick data");
        let ticks = self
            .tick_window(pair, self.settings.forecast_days * 24)
            .await?;
        Ok(daily_means(&ticks))
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Average tick price per calendar day, oldest first.
pub fn daily_means(ticks: &[TickRecord]) -> Vec<(DateTime<Utc>, f64)> {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for tick in ticks {
        let entry = days.entry(tick.timestamp.date_naive()).or_insert((0.0, 0));
        entry.0 += tick.price;
        entry.1 += 1;
    }
    days.into_iter()
        .map(|(date, (sum, count))| (midnight(date), sum / count as f64))
        .collect()
}
