//! Momentum and sentiment indicators.
//!
//! The math lives in two pure functions, [`rsi`] and [`panic_index`].
//! [`IndicatorEngine`] feeds them from storage over trailing windows.

use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use crate::application::parser::tables::PANIC_KEYWORDS;
use crate::application::signal::round2;
use crate::domain::CurrencyPair;
use crate::error::Result;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::store::Storage;

/// RSI returned when there is not enough history.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Relative Strength Index with Wilder smoothing.
///
/// The first average is a simple mean over the first `period` deltas, then
/// each later delta is folded in as `(avg * (period - 1) + x) / period`.
/// Fewer than `period + 1` prices (or `period == 0`) yields [`NEUTRAL_RSI`].
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let n = period as f64;

    let (gain_sum, loss_sum) = changes
        .iter()
        .take(period)
        .fold((0.0, 0.0), |(g, l), &change| {
            if change > 0.0 {
                (g + change, l)
            } else {
                (g, l - change)
            }
        });
    let mut avg_gain = gain_sum / n;
    let mut avg_loss = loss_sum / n;

    for &change in changes.iter().skip(period) {
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
    }

    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    round2(100.0 - 100.0 / (1.0 + rs))
}

/// Returns true when the text mentions any crisis keyword.
pub fn is_panicked(text: &str) -> bool {
    let lower = text.to_lowercase();
    PANIC_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Share of messages (0-100) containing at least one crisis keyword.
///
/// Each message counts once no matter how many keywords it hits.
pub fn panic_index<'a, I>(texts: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    let (total, panicked) = texts.into_iter().fold((0usize, 0usize), |(t, p), text| {
        (t + 1, p + usize::from(is_panicked(text)))
    });

    if total == 0 {
        return 0.0;
    }
    round2((panicked as f64 / total as f64 * 100.0).min(100.0))
}

/// Window sizes for indicator inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSettings {
    pub rsi_period: usize,
    pub rsi_window: Duration,
    pub panic_window: Duration,
    pub panic_sample: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_window: Duration::days(30),
            panic_window: Duration::hours(24),
            panic_sample: 100,
        }
    }
}

/// Computes indicators from stored ticks and messages.
pub struct IndicatorEngine {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    settings: IndicatorSettings,
}

impl IndicatorEngine {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, settings: IndicatorSettings) -> Self {
        Self {
            storage,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    /// RSI over the pair's tick prices in the trailing RSI window.
    pub async fn rsi(&self, pair: &CurrencyPair) -> Result<f64> {
        let now = self.clock.now();
        let ticks = self
            .storage
            .ticks_between(pair, now - self.settings.rsi_window, now)
            .await?;

        if ticks.len() < self.settings.rsi_period + 1 {
            debug!(pair = %pair, samples = ticks.len(), "Insufficient data for RSI, using neutral");
        }

        let prices: Vec<f64> = ticks.iter().map(|t| t.price).collect();
        Ok(rsi(&prices, self.settings.rsi_period))
    }

    /// Panic index over the most recent messages in the trailing panic window.
    pub async fn panic_index(&self) -> Result<f64> {
        let since = self.clock.now() - self.settings.panic_window;
        let messages = self
            .storage
            .recent_messages(Some(since), self.settings.panic_sample)
            .await?;
        Ok(panic_index(messages.iter().map(|m| m.text.as_str())))
    }
}
