//! Price observations extracted from channel messages.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::pair::CurrencyPair;

/// Exclusive lower bound for a plausible dinar rate.
pub const MIN_PRICE_EXCLUSIVE: f64 = 0.0;
/// Inclusive upper bound for a plausible dinar rate.
pub const MAX_PRICE: f64 = 100.0;

/// Which side of the market a quoted price refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Buy,
    Sell,
    #[default]
    Mid,
}

impl PriceType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Mid => "mid",
        }
    }
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "mid" => Ok(Self::Mid),
            other => Err(DomainError::UnknownPriceType(other.to_string())),
        }
    }
}

/// Check the `0 < price <= 100` sanity bound.
pub fn validate_price(price: f64) -> Result<f64, DomainError> {
    if price.is_finite() && price > MIN_PRICE_EXCLUSIVE && price <= MAX_PRICE {
        Ok(price)
    } else {
        Err(DomainError::PriceOutOfRange { price })
    }
}

/// Result of a successful parse: pair, price and side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTick {
    pair: CurrencyPair,
    price: f64,
    price_type: PriceType,
}

impl ParsedTick {
    /// Build a parsed tick, enforcing the price sanity bound.
    pub fn try_new(
        pair: CurrencyPair,
        price: f64,
        price_type: PriceType,
    ) -> Result<Self, DomainError> {
        let price = validate_price(price)?;
        Ok(Self {
            pair,
            price,
            price_type,
        })
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub const fn price(&self) -> f64 {
        self.price
    }

    pub const fn price_type(&self) -> PriceType {
        self.price_type
    }
}

/// A persisted price observation.
///
/// Only constructible from a [`ParsedTick`] (or a validated row), so the
/// price sanity bound holds for every record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickRecord {
    pub timestamp: DateTime<Utc>,
    pub pair: CurrencyPair,
    pub price: f64,
    pub price_type: PriceType,
    pub source_channel: String,
    pub raw_text: String,
    pub message_id: Option<i64>,
}

impl TickRecord {
    pub fn from_parsed(
        parsed: ParsedTick,
        timestamp: DateTime<Utc>,
        source_channel: impl Into<String>,
        raw_text: impl Into<String>,
        message_id: Option<i64>,
    ) -> Self {
        Self {
            timestamp,
            pair: parsed.pair,
            price: parsed.price,
            price_type: parsed.price_type,
            source_channel: source_channel.into(),
            raw_text: raw_text.into(),
            message_id,
        }
    }

    /// Rebuild a record read back from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        timestamp: DateTime<Utc>,
        pair: CurrencyPair,
        price: f64,
        price_type: PriceType,
        source_channel: String,
        raw_text: String,
        message_id: Option<i64>,
    ) -> Result<Self, DomainError> {
        let price = validate_price(price)?;
        Ok(Self {
            timestamp,
            pair,
            price,
            price_type,
            source_channel,
            raw_text,
            message_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_exclusive_below_inclusive_above() {
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(100.0).is_ok());
        assert!(validate_price(100.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(0.01).is_ok());
    }

    #[test]
    fn price_type_parses_labels() {
        assert_eq!("sell".parse::<PriceType>().unwrap(), PriceType::Sell);
        assert!("ask".parse::<PriceType>().is_err());
        assert_eq!(PriceType::default(), PriceType::Mid);
    }
}
