//! Typed events pushed to live subscribers.
//!
//! Serialized as `{"type": "...", ...}` JSON text frames.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::analysis::MarketAnalysis;
use super::pair::CurrencyPair;
use super::tick::{PriceType, TickRecord};

/// Greeting sent to each subscriber right after it connects.
pub const WELCOME_MESSAGE: &str = "Connected to Libyan Financial Terminal";

/// Payload of a `price_update` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceUpdate {
    pub timestamp: DateTime<Utc>,
    pub currency_pair: CurrencyPair,
    pub price: f64,
    pub price_type: PriceType,
    pub source_channel: String,
}

impl From<&TickRecord> for PriceUpdate {
    fn from(tick: &TickRecord) -> Self {
        Self {
            timestamp: tick.timestamp,
            currency_pair: tick.pair.clone(),
            price: tick.price,
            price_type: tick.price_type,
            source_channel: tick.source_channel.clone(),
        }
    }
}

/// Event delivered to live subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// Sent once, to the newly connected subscriber only.
    Connected {
        timestamp: DateTime<Utc>,
        message: String,
    },
    /// A tick was extracted and stored.
    PriceUpdate { data: PriceUpdate },
    /// An on-demand analysis completed.
    AnalysisUpdate { data: Box<MarketAnalysis> },
}

impl LiveEvent {
    pub fn connected(timestamp: DateTime<Utc>) -> Self {
        Self::Connected {
            timestamp,
            message: WELCOME_MESSAGE.to_string(),
        }
    }

    pub fn price_update(tick: &TickRecord) -> Self {
        Self::PriceUpdate {
            data: PriceUpdate::from(tick),
        }
    }

    pub fn analysis_update(analysis: MarketAnalysis) -> Self {
        Self::AnalysisUpdate {
            data: Box::new(analysis),
        }
    }

    /// Wire name of the event type.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::PriceUpdate { .. } => "price_update",
            Self::AnalysisUpdate { .. } => "analysis_update",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tick::ParsedTick;

    #[test]
    fn price_update_wire_shape() {
        let parsed = ParsedTick::try_new(CurrencyPair::usd_lyd(), 7.25, PriceType::Sell).unwrap();
        let tick = TickRecord::from_parsed(parsed, Utc::now(), "EwanLibya", "USD/LYD: 7.25 بيع", Some(9));
        let value = serde_json::to_value(LiveEvent::price_update(&tick)).unwrap();

        assert_eq!(value["type"], "price_update");
        assert_eq!(value["data"]["currency_pair"], "USD/LYD");
        assert_eq!(value["data"]["price"], 7.25);
        assert_eq!(value["data"]["price_type"], "sell");
        assert_eq!(value["data"]["source_channel"], "EwanLibya");
        assert!(value["data"]["timestamp"].is_string());
    }

    #[test]
    fn connected_wire_shape() {
        let value = serde_json::to_value(LiveEvent::connected(Utc::now())).unwrap();
        assert_eq!(value["type"], "connected");
        assert_eq!(value["message"], WELCOME_MESSAGE);
    }
}
