//! Historical rate sources.
//!
//! [`HttpRateSource`] reads end-of-day bars from the fulus.ly API.
//! [`SyntheticRateSource`] generates a seeded random walk and is only
//! ever wired as an explicit fallback.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{CurrencyPair, DailyBar, SOURCE_FULUS, SOURCE_SYNTHETIC};
use crate::error::{Error, Result};
use crate::port::outbound::rates::RateSource;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Client for the fulus.ly `/rates` endpoint.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: Client,
    api_url: String,
}

impl HttpRateSource {
    /// Build a client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    data: Vec<RateRow>,
}

#[derive(Debug, Deserialize)]
struct RateRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

impl RateRow {
    fn into_bar(self, pair: &CurrencyPair) -> Result<DailyBar> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| Error::Parse(format!("bar date {:?}: {e}", self.date)))?;
        Ok(DailyBar::try_new(
            date,
            pair.clone(),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            SOURCE_FULUS,
        )?)
    }
}

/// Convert a response body, skipping rows that fail validation.
fn bars_from_response(pair: &CurrencyPair, response: RatesResponse) -> Vec<DailyBar> {
    response
        .data
        .into_iter()
        .filter_map(|row| match row.into_bar(pair) {
            Ok(bar) => Some(bar),
            Err(e) => {
                warn!(pair = %pair, error = %e, "Skipping invalid rate row");
                None
            }
        })
        .collect()
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_bars(
        &self,
        pair: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>> {
        let url = format!("{}/rates", self.api_url);
        let start = start.format(DATE_FORMAT).to_string();
        let end = end.format(DATE_FORMAT).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("pair", pair.as_str()), ("start", start.as_str()), ("end", end.as_str())])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json::<RatesResponse>()
            .await?;

        let bars = bars_from_response(pair, response);
        debug!(pair = %pair, count = bars.len(), "Fetched rate bars");
        Ok(bars)
    }

    fn name(&self) -> &'static str {
        SOURCE_FULUS
    }
}

/// Seeded random-walk bars, tagged `synthetic`.
///
/// The same pair and start date always produce the same bars.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticRateSource;

impl SyntheticRateSource {
    pub fn new() -> Self {
        Self
    }

    fn base_price(pair: &CurrencyPair) -> f64 {
        if pair.base() == "USD" {
            4.8
        } else {
            5.2
        }
    }

    fn seed(pair: &CurrencyPair, start: NaiveDate) -> u64 {
        // FNV-1a over the pair and start date.
        let key = format!("{}|{}", pair.as_str(), start.format(DATE_FORMAT));
        key.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
    }

    /// Generate bars for every day in `start..=end`.
    pub fn generate(&self, pair: &CurrencyPair, start: NaiveDate, end: NaiveDate) -> Vec<DailyBar> {
        let mut rng = StdRng::seed_from_u64(Self::seed(pair, start));
        let mut price = Self::base_price(pair);
        let mut bars = Vec::new();
        let mut date = start;

        while date <= end {
            price = (price + rng.gen_range(-0.1..=0.1)).max(0.01);
            let close = round4(price);
            let open = round4((price + rng.gen_range(-0.05..=0.05)).max(0.01));
            let high = round4(open.max(close) + rng.gen_range(0.0..=0.1));
            let low = round4((open.min(close) - rng.gen_range(0.0..=0.1)).max(0.0));
            let volume = f64::from(rng.gen_range(100_000_u32..=500_000));

            if let Ok(bar) = DailyBar::try_new(
                date,
                pair.clone(),
                open,
                high,
                low,
                close,
                Some(volume),
                SOURCE_SYNTHETIC,
            ) {
                bars.push(bar);
            }
            date += TimeDelta::days(1);
        }
        bars
    }
}

#[async_trait]
impl RateSource for SyntheticRateSource {
    async fn fetch_bars(
        &self,
        pair: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>> {
        Ok(self.generate(pair, start, end))
    }

    fn name(&self) -> &'static str {
        SOURCE_SYNTHETIC
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
