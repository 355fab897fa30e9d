//! Forecasting port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ForecastPoint;
use crate::error::Result;

/// Opaque time-series forecaster.
///
/// Given an ordered `(timestamp, value)` series, returns up to
/// `horizon_hours` hourly points following the last observation.
/// Too little history yields an empty vector, not an error.
#[async_trait]
pub trait Forecaster: Send + Sync {
    async fn forecast(
        &self,
        series: &[(DateTime<Utc>, f64)],
        horizon_hours: usize,
    ) -> Result<Vec<ForecastPoint>>;

    /// Model name for logging.
    fn name(&self) -> &'static str;
}
