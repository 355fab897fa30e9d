//! Forecast points returned by the forecasting collaborator.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::signal::ForecastTrend;

/// Relative move between first and last point that counts as a trend.
pub const TREND_THRESHOLD: f64 = 0.01;

/// A single predicted value with its interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub predicted_price: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub confidence: f64,
}

impl ForecastTrend {
    /// Classify a forecast path by comparing its last point to its first.
    ///
    /// An empty forecast is neutral.
    pub fn from_points(points: &[ForecastPoint]) -> Self {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Self::Neutral;
        };
        let first = first.predicted_price;
        let last = last.predicted_price;
        if last > first * (1.0 + TREND_THRESHOLD) {
            Self::Up
        } else if last < first * (1.0 - TREND_THRESHOLD) {
            Self::Down
        } else {
            Self::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(price: f64) -> ForecastPoint {
        ForecastPoint {
            timestamp: Utc::now(),
            predicted_price: price,
            lower_bound: price - 0.1,
            upper_bound: price + 0.1,
            confidence: 0.95,
        }
    }

    #[test]
    fn trend_classification() {
        assert_eq!(ForecastTrend::from_points(&[]), ForecastTrend::Neutral);
        assert_eq!(
            ForecastTrend::from_points(&[point(5.0), point(5.2)]),
            ForecastTrend::Up
        );
        assert_eq!(
            ForecastTrend::from_points(&[point(5.0), point(4.8)]),
            ForecastTrend::Down
        );
        assert_eq!(
            ForecastTrend::from_points(&[point(5.0), point(5.04)]),
            ForecastTrend::Neutral
        );
    }
}
