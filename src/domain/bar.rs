//! Daily OHLC bars reconciled from the historical rate source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::pair::CurrencyPair;

/// Source tag for bars fetched from the authoritative rate API.
pub const SOURCE_FULUS: &str = "fulus.ly";
/// Source tag for generated, non-authoritative bars.
pub const SOURCE_SYNTHETIC: &str = "synthetic";

/// One calendar day of rates for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub pair: CurrencyPair,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
    pub source: String,
}

impl DailyBar {
    /// Build a bar, rejecting `low > high`.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        date: NaiveDate,
        pair: CurrencyPair,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<f64>,
        source: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if low > high {
            return Err(DomainError::InconsistentBar { date, low, high });
        }
        Ok(Self {
            date,
            pair,
            open,
            high,
            low,
            close,
            volume,
            source: source.into(),
        })
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.source == SOURCE_SYNTHETIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_range() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let err = DailyBar::try_new(
            date,
            CurrencyPair::usd_lyd(),
            5.0,
            4.9,
            5.1,
            5.0,
            None,
            SOURCE_FULUS,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InconsistentBar { .. }));
    }
}
