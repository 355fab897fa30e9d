//! Historical rate source port.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{CurrencyPair, DailyBar};
use crate::error::Result;

/// Authoritative source of daily end-of-day rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch bars for `start..=end`.
    async fn fetch_bars(
        &self,
        pair: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>>;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}
