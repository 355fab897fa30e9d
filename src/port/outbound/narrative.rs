//! Narrative generation port.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{CurrencyPair, MessageExcerpt, Signal};
use crate::error::Result;

/// Structured facts a narrative is written from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeContext {
    pub pair: CurrencyPair,
    pub current_price: f64,
    pub rsi: f64,
    pub panic_index: f64,
    pub signal: Signal,
    pub confidence: f64,
    pub excerpts: Vec<MessageExcerpt>,
}

impl NarrativeContext {
    /// Fixed sentence used whenever no narrator is available or it fails.
    pub fn templated(&self) -> String {
        format!(
            "Market shows {} signal with {:.0}% confidence based on technical indicators.",
            self.signal, self.confidence
        )
    }
}

/// Free-text commentary about current market conditions.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn narrate(&self, context: &NarrativeContext) -> Result<String>;
}
