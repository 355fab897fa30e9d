//! Trading signal types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classified trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction implied by the forecast collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastTrend {
    Up,
    Down,
    #[default]
    Neutral,
}

/// Output of the signal generator. Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalResult {
    pub signal: Signal,
    /// Within `[0, 95]`; rounded to 2 decimals.
    pub confidence: f64,
    pub rsi: f64,
    #[serde(rename = "market_panic_index")]
    pub panic_index: f64,
    #[serde(rename = "reasoning")]
    pub rationale: String,
}
