//! Persistence ports for ticks, messages and daily bars.
//!
//! Writes are append-only and each write is atomic and immediately visible
//! to subsequent reads. Implementations must tolerate concurrent writers.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{CurrencyPair, DailyBar, MessageRecord, TickRecord};
use crate::error::Result;

/// Storage operations for price ticks.
#[async_trait]
pub trait TickStore: Send + Sync {
    /// Append one tick.
    async fn append_tick(&self, tick: &TickRecord) -> Result<()>;

    /// Most recent `limit` ticks for a pair, newest first.
    async fn latest_ticks(&self, pair: &CurrencyPair, limit: usize) -> Result<Vec<TickRecord>>;

    /// Ticks for a pair with `from <= timestamp <= to`, oldest first.
    async fn ticks_between(
        &self,
        pair: &CurrencyPair,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TickRecord>>;
}

/// Storage operations for inbound messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append one message.
    async fn append_message(&self, message: &MessageRecord) -> Result<()>;

    /// Messages newer than `since` (all when `None`), newest first, at most `limit`.
    async fn recent_messages(
        &self,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<MessageRecord>>;
}

/// Storage operations for daily bars.
#[async_trait]
pub trait BarStore: Send + Sync {
    /// Append bars. A bar whose (pair, date) already exists is skipped,
    /// except that an authoritative bar replaces a synthetic one. Real data
    /// is never overwritten. Returns the number of rows written.
    async fn append_bars(&self, bars: &[DailyBar]) -> Result<usize>;

    /// Date of the newest authoritative bar for a pair. Synthetic bars are
    /// ignored so a recovered source backfills over them.
    async fn latest_bar_date(&self, pair: &CurrencyPair) -> Result<Option<NaiveDate>>;

    /// Bars for a pair with `from <= date <= to`, oldest first.
    async fn bars_between(
        &self,
        pair: &CurrencyPair,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBar>>;
}

/// Everything the core needs from storage.
pub trait Storage: TickStore + MessageStore + BarStore {}

impl<T: TickStore + MessageStore + BarStore> Storage for T {}
