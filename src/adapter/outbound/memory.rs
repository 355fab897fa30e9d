//! In-memory store for tests and dry runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;

use crate::domain::{CurrencyPair, DailyBar, MessageRecord, TickRecord};
use crate::error::Result;
use crate::port::outbound::store::{BarStore, MessageStore, TickStore};

/// Thread-safe store keeping every record in memory.
///
/// Insertion order breaks timestamp ties, matching the SQLite store.
#[derive(Default)]
pub struct MemoryStore {
    ticks: RwLock<Vec<TickRecord>>,
    messages: RwLock<Vec<MessageRecord>>,
    bars: RwLock<BTreeMap<(CurrencyPair, NaiveDate), DailyBar>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_count(&self) -> usize {
        self.ticks.read().len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.read().len()
    }

    pub fn bar_count(&self) -> usize {
        self.bars.read().len()
    }
}

#[async_trait]
impl TickStore for MemoryStore {
    async fn append_tick(&self, tick: &TickRecord) -> Result<()> {
        self.ticks.write().push(tick.clone());
        Ok(())
    }

    async fn latest_ticks(&self, pair: &CurrencyPair, limit: usize) -> Result<Vec<TickRecord>> {
        let ticks = self.ticks.read();
        let mut matching: Vec<&TickRecord> = ticks.iter().filter(|t| t.pair == *pair).collect();
        matching.sort_by_key(|t| t.timestamp);
        Ok(matching.into_iter().rev().take(limit).cloned().collect())
    }

    async fn ticks_between(
        &self,
        pair: &CurrencyPair,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TickRecord>> {
        let ticks = self.ticks.read();
        let mut matching: Vec<TickRecord> = ticks
            .iter()
            .filter(|t| t.pair == *pair && t.timestamp >= from && t.timestamp <= to)
            .cloned()
            .collect();
        matching.sort_by_key(|t| t.timestamp);
        Ok(matching)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append_message(&self, message: &MessageRecord) -> Result<()> {
        self.messages.write().push(message.clone());
        Ok(())
    }

    async fn recent_messages(
        &self,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<MessageRecord>> {
        let messages = self.messages.read();
        let mut matching: Vec<&MessageRecord> = messages
            .iter()
            .filter(|m| since.map_or(true, |since| m.timestamp >= since))
            .collect();
        matching.sort_by_key(|m| m.timestamp);
        Ok(matching.into_iter().rev().take(limit).cloned().collect())
    }
}

#[async_trait]
impl BarStore for MemoryStore {
    async fn append_bars(&self, bars: &[DailyBar]) -> Result<usize> {
        let mut stored = self.bars.write();
        let mut inserted = 0;
        for bar in bars {
            let key = (bar.pair.clone(), bar.date);
            let replaceable = match stored.get(&key) {
                Some(existing) => existing.is_synthetic() && !bar.is_synthetic(),
                None => true,
            };
            if replaceable {
                stored.insert(key, bar.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn latest_bar_date(&self, pair: &CurrencyPair) -> Result<Option<NaiveDate>> {
        Ok(self
            .bars
            .read()
            .values()
            .filter(|bar| bar.pair == *pair && !bar.is_synthetic())
            .map(|bar| bar.date)
            .max())
    }

    async fn bars_between(
        &self,
        pair: &CurrencyPair,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBar>> {
        Ok(self
            .bars
            .read()
            .values()
            .filter(|b| b.pair == *pair && b.date >= from && b.date <= to)
            .cloned()
            .collect())
    }
}
