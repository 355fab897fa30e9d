//! Service section configuration: ingestion, live server, sync, analysis.

use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use crate::application::analysis::AnalysisSettings;
use crate::application::indicator::IndicatorSettings;
use crate::application::sync::SyncSettings;
use crate::domain::CurrencyPair;
use crate::error::{ConfigError, Error, Result};

/// `[ingestion]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Run the channel feed at all.
    pub enabled: bool,
    /// Monitored channels, e.g. `@EwanLibya`.
    pub channels: Vec<String>,
    /// Minimum spacing between processed messages, in seconds.
    pub buffer_secs: u64,
    /// One limiter for every channel instead of one per channel.
    pub shared_limiter: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channels: vec!["@EwanLibya".into(), "@AlMushir".into()],
            buffer_secs: 5,
            shared_limiter: false,
        }
    }
}

impl IngestionConfig {
    pub const fn buffer(&self) -> Duration {
        Duration::from_secs(self.buffer_secs)
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Bound on one frame write, in milliseconds.
    pub send_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".into(),
            send_timeout_ms: 5_000,
        }
    }
}

/// `[sync]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub enabled: bool,
    pub pairs: Vec<String>,
    pub interval_hours: u64,
    pub lookback_days: i64,
    pub api_url: String,
    /// Fall back to synthetic bars when the rate API fails. Offline use only.
    pub allow_synthetic: bool,
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pairs: vec!["USD/LYD".into(), "EUR/LYD".into()],
            interval_hours: 24,
            lookback_days: 30,
            api_url: "https://api.fulus.ly/v1".into(),
            allow_synthetic: false,
            timeout_secs: 30,
        }
    }
}

impl SyncConfig {
    /// Parsed pair list.
    ///
    /// # Errors
    ///
    /// Returns an error if any pair is blank.
    pub fn currency_pairs(&self) -> Result<Vec<CurrencyPair>> {
        self.pairs
            .iter()
            .map(|pair| {
                CurrencyPair::try_new(pair.as_str()).map_err(|e| {
                    Error::from(ConfigError::InvalidValue {
                        field: "sync.pairs",
                        reason: e.to_string(),
                    })
                })
            })
            .collect()
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Scheduler settings for this section.
    ///
    /// # Errors
    ///
    /// Returns an error if the pair list is invalid.
    pub fn settings(&self) -> Result<SyncSettings> {
        Ok(SyncSettings {
            pairs: self.currency_pairs()?,
            interval: Duration::from_secs(self.interval_hours * 3600),
            lookback_days: self.lookback_days,
        })
    }
}

/// `[analysis]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub rsi_period: usize,
    pub rsi_window_days: i64,
    pub panic_window_hours: i64,
    pub panic_sample: usize,
    pub recent_messages: usize,
    pub forecast_days: i64,
    /// Minutes between published analyses. Zero disables publishing.
    pub publish_interval_mins: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_window_days: 30,
            panic_window_hours: 24,
            panic_sample: 100,
            recent_messages: 10,
            forecast_days: 30,
            publish_interval_mins: 60,
        }
    }
}

impl AnalysisConfig {
    pub fn indicator_settings(&self) -> IndicatorSettings {
        IndicatorSettings {
            rsi_period: self.rsi_period,
            rsi_window: TimeDelta::days(self.rsi_window_days),
            panic_window: TimeDelta::hours(self.panic_window_hours),
            panic_sample: self.panic_sample,
        }
    }

    /// Publishing interval, `None` when disabled.
    pub const fn publish_interval(&self) -> Option<Duration> {
        if self.publish_interval_mins == 0 {
            None
        } else {
            Some(Duration::from_secs(self.publish_interval_mins * 60))
        }
    }

    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            recent_messages: self.recent_messages,
            forecast_days: self.forecast_days,
        }
    }
}
