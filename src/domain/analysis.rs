//! Complete market analysis for one pair.

use serde::Serialize;

use super::forecast::ForecastPoint;
use super::message::MessageExcerpt;
use super::pair::CurrencyPair;
use super::signal::SignalResult;

/// Snapshot combining price, forecast, signal and narrative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketAnalysis {
    /// Most recent tick price, or `0.0` when no tick exists yet.
    pub current_price: f64,
    #[serde(rename = "currency_pair")]
    pub pair: CurrencyPair,
    pub forecast_24h: Vec<ForecastPoint>,
    pub forecast_48h: Vec<ForecastPoint>,
    pub signal: SignalResult,
    pub recent_messages: Vec<MessageExcerpt>,
    #[serde(rename = "ai_reasoning")]
    pub narrative: String,
}
