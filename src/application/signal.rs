//! Trading signal generation from RSI, panic index and forecast direction.
//!
//! [`generate`] is pure. Thresholds are applied in a fixed order: RSI band
//! first, then the panic adjustment, then forecast confirmation.

use crate::domain::{ForecastTrend, Signal, SignalResult};

/// RSI below this is oversold.
pub const RSI_OVERSOLD: f64 = 30.0;
/// RSI above this is overbought.
pub const RSI_OVERBOUGHT: f64 = 70.0;
/// Upper edge of the weak-buy band `[30, 40)`.
pub const RSI_WEAK_BUY: f64 = 40.0;
/// Lower edge of the weak-sell band `(60, 70]`.
pub const RSI_WEAK_SELL: f64 = 60.0;

/// Panic above this dampens buys and turns holds into sells.
pub const PANIC_HIGH: f64 = 60.0;
/// Panic below this is reported as calm.
pub const PANIC_CALM: f64 = 20.0;

/// Multiplier applied to BUY confidence under high panic.
pub const PANIC_BUY_DAMPING: f64 = 0.7;
/// Confidence assigned when high panic flips HOLD to SELL.
pub const PANIC_SELL_CONFIDENCE: f64 = 55.0;
/// Multiplier applied when the forecast agrees with the signal.
pub const FORECAST_BOOST: f64 = 1.2;
/// Confidence ceiling.
pub const MAX_CONFIDENCE: f64 = 95.0;

/// Classify market conditions into a signal with confidence and rationale.
///
/// Confidence has no lower clamp: a weak BUY under heavy panic ends at 42.
pub fn generate(rsi: f64, panic_index: f64, trend: ForecastTrend) -> SignalResult {
    let mut rationale = String::new();

    let (mut signal, mut confidence) = if rsi < RSI_OVERSOLD {
        rationale.push_str("RSI indicates oversold conditions. ");
        (Signal::Buy, 70.0)
    } else if rsi > RSI_OVERBOUGHT {
        rationale.push_str("RSI indicates overbought conditions. ");
        (Signal::Sell, 70.0)
    } else if rsi < RSI_WEAK_BUY {
        rationale.push_str("RSI approaching oversold territory. ");
        (Signal::Buy, 60.0)
    } else if rsi > RSI_WEAK_SELL {
        rationale.push_str("RSI approaching overbought territory. ");
        (Signal::Sell, 60.0)
    } else {
        (Signal::Hold, 50.0)
    };

    if panic_index > PANIC_HIGH {
        match signal {
            Signal::Buy => confidence *= PANIC_BUY_DAMPING,
            Signal::Hold => {
                signal = Signal::Sell;
                confidence = PANIC_SELL_CONFIDENCE;
            }
            Signal::Sell => {}
        }
        rationale.push_str(&format!(
            "High market panic detected ({panic_index:.0}/100). "
        ));
    } else if panic_index < PANIC_CALM {
        rationale.push_str("Market sentiment is calm. ");
    }

    match (trend, signal) {
        (ForecastTrend::Up, Signal::Buy) => {
            confidence = (confidence * FORECAST_BOOST).min(MAX_CONFIDENCE);
            rationale.push_str("Forecast confirms upward trend. ");
        }
        (ForecastTrend::Down, Signal::Sell) => {
            confidence = (confidence * FORECAST_BOOST).min(MAX_CONFIDENCE);
            rationale.push_str("Forecast confirms downward trend. ");
        }
        _ => {}
    }

    SignalResult {
        signal,
        confidence: round2(confidence),
        rsi: round2(rsi),
        panic_index,
        rationale: rationale.trim_end().to_string(),
    }
}

/// Round half away from zero to 2 decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
