use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeDelta};
use lydwatch::domain::{CurrencyPair, DailyBar, InboundMessage, SOURCE_FULUS};
use lydwatch::error::{Error, Result};
use lydwatch::port::inbound::MessageSource;
use lydwatch::port::outbound::rates::RateSource;
use parking_lot::Mutex;

/// Message source that replays a fixed list, then ends.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    name: String,
    messages: VecDeque<InboundMessage>,
}

impl ScriptedSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            messages: VecDeque::new(),
        }
    }

    pub fn push(mut self, message_id: i64, text: &str) -> Self {
        self.messages
            .push_back(InboundMessage::new(self.name.clone(), message_id, text));
        self
    }
}

#[async_trait]
impl MessageSource for ScriptedSource {
    async fn next_message(&mut self) -> Option<InboundMessage> {
        self.messages.pop_front()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Rate source that serves one flat bar per requested day and records
/// every request. Can be switched to fail.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRates {
    requests: Arc<Mutex<Vec<(CurrencyPair, NaiveDate, NaiveDate)>>>,
    failing: Arc<Mutex<bool>>,
}

impl ScriptedRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let rates = Self::default();
        rates.set_failing(true);
        rates
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn requests(&self) -> Vec<(CurrencyPair, NaiveDate, NaiveDate)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl RateSource for ScriptedRates {
    async fn fetch_bars(
        &self,
        pair: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>> {
        self.requests.lock().push((pair.clone(), start, end));
        if *self.failing.lock() {
            return Err(Error::Connection("rate API unavailable".into()));
        }

        let mut bars = Vec::new();
        let mut date = start;
        while date <= end {
            bars.push(DailyBar::try_new(date, pair.clone(), 7.0, 7.1, 6.9, 7.05, Some(1000.0), SOURCE_FULUS)?);
            date += TimeDelta::days(1);
        }
        Ok(bars)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
