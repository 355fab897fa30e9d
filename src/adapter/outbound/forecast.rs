//! Least-squares trend forecaster.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::ForecastPoint;
use crate::error::Result;
use crate::port::outbound::forecast::Forecaster;

/// Two-sided z-score for the 95% interval.
const Z_95: f64 = 1.96;
const CONFIDENCE: f64 = 0.95;

/// Fits a straight line through the series and extrapolates hourly.
///
/// Bands are the fitted value plus or minus `1.96 * sigma` of the
/// residuals, so a perfectly linear history yields zero-width bands.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrendForecaster;

impl LinearTrendForecaster {
    pub fn new() -> Self {
        Self
    }
}

struct Fit {
    origin: DateTime<Utc>,
    intercept: f64,
    slope: f64,
    sigma: f64,
}

impl Fit {
    fn hours_since_origin(&self, at: DateTime<Utc>) -> f64 {
        (at - self.origin).num_seconds() as f64 / 3600.0
    }

    fn at(&self, at: DateTime<Utc>) -> f64 {
        self.intercept + self.slope * self.hours_since_origin(at)
    }
}

fn fit(series: &[(DateTime<Utc>, f64)]) -> Option<Fit> {
    let origin = series.first()?.0;
    let n = series.len() as f64;
    let xs: Vec<f64> = series
        .iter()
        .map(|(t, _)| (*t - origin).num_seconds() as f64 / 3600.0)
        .collect();
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = series.iter().map(|(_, y)| y).sum::<f64>() / n;

    let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    let sxy: f64 = xs
        .iter()
        .zip(series)
        .map(|(x, (_, y))| (x - mean_x) * (y - mean_y))
        .sum();
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let intercept = mean_y - slope * mean_x;

    let residual_ss: f64 = xs
        .iter()
        .zip(series)
        .map(|(x, (_, y))| (y - (intercept + slope * x)).powi(2))
        .sum();
    let sigma = (residual_ss / n).sqrt();

    Some(Fit {
        origin,
        intercept,
        slope,
        sigma,
    })
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[async_trait]
impl Forecaster for LinearTrendForecaster {
    async fn forecast(
        &self,
        series: &[(DateTime<Utc>, f64)],
        horizon_hours: usize,
    ) -> Result<Vec<ForecastPoint>> {
        if series.len() < 2 {
            return Ok(Vec::new());
        }
        let Some(model) = fit(series) else {
            return Ok(Vec::new());
        };
        let last = series.iter().map(|(t, _)| *t).max().unwrap_or(model.origin);
        let band = Z_95 * model.sigma;

        Ok((1..=horizon_hours)
            .map(|hour| {
                let timestamp = last + TimeDelta::hours(hour as i64);
                let predicted = model.at(timestamp);
                ForecastPoint {
                    timestamp,
                    predicted_price: round4(predicted),
                    lower_bound: round4(predicted - band),
                    upper_bound: round4(predicted + band),
                    confidence: CONFIDENCE,
                }
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "linear-trend"
    }
}
