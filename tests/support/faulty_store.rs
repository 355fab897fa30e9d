use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use lydwatch::domain::{CurrencyPair, DailyBar, MessageRecord, TickRecord};
use lydwatch::error::{Error, Result};
use lydwatch::port::outbound::store::{BarStore, MessageStore, Storage, TickStore};
use parking_lot::Mutex;

#[derive(Default)]
struct Calls {
    messages: usize,
    ticks: usize,
}

/// Storage that fails chosen writes and passes everything else through.
///
/// Calls are counted from 1 per write kind.
pub struct FaultyStore {
    inner: Arc<dyn Storage>,
    failing_messages: HashSet<usize>,
    failing_ticks: HashSet<usize>,
    calls: Mutex<Calls>,
}

impl FaultyStore {
    pub fn new(inner: Arc<dyn Storage>) -> Self {
        Self {
            inner,
            failing_messages: HashSet::new(),
            failing_ticks: HashSet::new(),
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn fail_message_write(mut self, call: usize) -> Self {
        self.failing_messages.insert(call);
        self
    }

    pub fn fail_tick_write(mut self, call: usize) -> Self {
        self.failing_ticks.insert(call);
        self
    }
}

fn disk_full() -> Error {
    Error::Database("database or disk is full".into())
}

#[async_trait]
impl TickStore for FaultyStore {
    async fn append_tick(&self, tick: &TickRecord) -> Result<()> {
        let call = {
            let mut calls = self.calls.lock();
            calls.ticks += 1;
            calls.ticks
        };
        if self.failing_ticks.contains(&call) {
            return Err(disk_full());
        }
        self.inner.append_tick(tick).await
    }

    async fn latest_ticks(&self, pair: &CurrencyPair, limit: usize) -> Result<Vec<TickRecord>> {
        self.inner.latest_ticks(pair, limit).await
    }

    async fn ticks_between(
        &self,
        pair: &CurrencyPair,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TickRecord>> {
        self.inner.ticks_between(pair, from, to).await
    }
}

#[async_trait]
impl MessageStore for FaultyStore {
    async fn append_message(&self, message: &MessageRecord) -> Result<()> {
        let call = {
            let mut calls = self.calls.lock();
            calls.messages += 1;
            calls.messages
        };
        if self.failing_messages.contains(&call) {
            return Err(disk_full());
        }
        self.inner.append_message(message).await
    }

    async fn recent_messages(
        &self,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<MessageRecord>> {
        self.inner.recent_messages(since, limit).await
    }
}

#[async_trait]
impl BarStore for FaultyStore {
    async fn append_bars(&self, bars: &[DailyBar]) -> Result<usize> {
        self.inner.append_bars(bars).await
    }

    async fn latest_bar_date(&self, pair: &CurrencyPair) -> Result<Option<NaiveDate>> {
        self.inner.latest_bar_date(pair).await
    }

    async fn bars_between(
        &self,
        pair: &CurrencyPair,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBar>> {
        self.inner.bars_between(pair, from, to).await
    }
}
