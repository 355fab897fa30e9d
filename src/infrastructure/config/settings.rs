//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides.
//! Secrets (`TELEGRAM_BOT_TOKEN`, `OPENAI_API_KEY`) are only ever read from
//! the environment.
//!
//! # Example
//!
//! ```no_run
//! use lydwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::llm::LlmConfig;
use super::logging::LoggingConfig;
use super::service::{AnalysisConfig, IngestionConfig, ServerConfig, SyncConfig};
use crate::error::{ConfigError, Result};

/// Overrides the database path.
pub const ENV_DATABASE: &str = "LYDWATCH_DATABASE";
/// Overrides the live server bind address.
pub const ENV_BIND: &str = "LYDWATCH_BIND";
/// Overrides the historical rate API URL.
pub const ENV_RATES_API: &str = "FULUS_API_URL";

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Path to SQLite database file.
    ///
    /// Defaults to "lydwatch.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Channel feed and rate limiting.
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// Live update WebSocket server.
    #[serde(default)]
    pub server: ServerConfig,

    /// Daily bar reconciliation.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Indicator windows and analysis output.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Narrative model.
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            ingestion: IngestionConfig::default(),
            server: ServerConfig::default(),
            sync: SyncConfig::default(),
            analysis: AnalysisConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

fn default_database_path() -> String {
    "lydwatch.db".to_string()
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Parse configuration from TOML content and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn apply_env(&mut self) {
        if let Some(database) = env_override(ENV_DATABASE) {
            self.database = database;
        }
        if let Some(bind) = env_override(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(api_url) = env_override(ENV_RATES_API) {
            self.sync.api_url = api_url;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        if self.ingestion.enabled && self.ingestion.channels.iter().all(|c| c.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "ingestion.channels",
                reason: "at least one channel is required when ingestion is enabled".to_string(),
            }
            .into());
        }

        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "server.bind",
            }
            .into());
        }
        if self.server.send_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.send_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.sync.pairs.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sync.pairs",
                reason: "at least one pair is required".to_string(),
            }
            .into());
        }
        self.sync.currency_pairs()?;
        if self.sync.interval_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sync.interval_hours",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.sync.lookback_days <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "sync.lookback_days",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.sync.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "sync.api_url",
            }
            .into());
        }
        Url::parse(&self.sync.api_url).map_err(|e| ConfigError::InvalidValue {
            field: "sync.api_url",
            reason: e.to_string(),
        })?;
        if self.sync.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sync.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.analysis.rsi_period == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.rsi_period",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.analysis.rsi_window_days <= 0 || self.analysis.panic_window_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis",
                reason: "indicator windows must be greater than 0".to_string(),
            }
            .into());
        }
        if self.analysis.panic_sample == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.panic_sample",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature",
                reason: "must be between 0 and 2".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn invalid_field(result: Result<Config>) -> &'static str {
        match result {
            Err(Error::Config(ConfigError::InvalidValue { field, .. }))
            | Err(Error::Config(ConfigError::MissingField { field })) => field,
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database, "lydwatch.db");
        assert_eq!(config.ingestion.buffer_secs, 5);
        assert!(!config.ingestion.shared_limiter);
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.sync.interval_hours, 24);
        assert!(!config.sync.allow_synthetic);
        assert_eq!(config.analysis.rsi_period, 14);
        assert_eq!(config.llm.model, "gpt-4o");
        config.validate().unwrap();
    }

    #[test]
    fn sections_override_defaults() {
        let toml = r#"
            database = "rates.db"

            [logging]
            level = "debug"
            format = "json"

            [ingestion]
            channels = ["@OnlyOne"]
            buffer_secs = 2
            shared_limiter = true

            [sync]
            pairs = ["USD/LYD"]
            allow_synthetic = true

            [analysis]
            rsi_period = 9
        "#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.database, "rates.db");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.ingestion.channels, vec!["@OnlyOne"]);
        assert!(config.ingestion.shared_limiter);
        assert!(config.sync.allow_synthetic);
        assert_eq!(config.sync.lookback_days, 30);
        assert_eq!(config.analysis.rsi_period, 9);
        assert_eq!(config.analysis.panic_sample, 100);
    }

    #[test]
    fn rejects_empty_channels_only_when_ingesting() {
        let toml = "[ingestion]\nchannels = []\n";
        assert_eq!(invalid_field(Config::parse_toml(toml)), "ingestion.channels");

        let toml = "[ingestion]\nenabled = false\nchannels = []\n";
        assert!(Config::parse_toml(toml).is_ok());
    }

    #[test]
    fn rejects_bad_sync_settings() {
        assert_eq!(
            invalid_field(Config::parse_toml("[sync]\ninterval_hours = 0\n")),
            "sync.interval_hours"
        );
        assert_eq!(
            invalid_field(Config::parse_toml("[sync]\napi_url = \"not a url\"\n")),
            "sync.api_url"
        );
        assert_eq!(
            invalid_field(Config::parse_toml("[sync]\npairs = []\n")),
            "sync.pairs"
        );
        assert_eq!(
            invalid_field(Config::parse_toml("[sync]\npairs = [\"  \"]\n")),
            "sync.pairs"
        );
    }

    #[test]
    fn rejects_zero_rsi_period() {
        assert_eq!(
            invalid_field(Config::parse_toml("[analysis]\nrsi_period = 0\n")),
            "analysis.rsi_period"
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = Config::parse_toml("database = ");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn section_settings_convert() {
        let config = Config::default();
        let sync = config.sync.settings().unwrap();
        assert_eq!(sync.pairs.len(), 2);
        assert_eq!(sync.interval.as_secs(), 24 * 3600);

        let indicators = config.analysis.indicator_settings();
        assert_eq!(indicators.rsi_window.num_days(), 30);
        assert_eq!(indicators.panic_window.num_hours(), 24);
    }
}
