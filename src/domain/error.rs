//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors that validate inputs.
//!
//! # Examples
//!
//! ```
//! use lydwatch::domain::error::DomainError;
//! use lydwatch::domain::{CurrencyPair, ParsedTick, PriceType};
//!
//! let result = ParsedTick::try_new(CurrencyPair::usd_lyd(), 150.0, PriceType::Mid);
//! assert!(matches!(result, Err(DomainError::PriceOutOfRange { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Prices must satisfy `0 < price <= 100`.
    #[error("price {price} outside sanity range (0, 100]")]
    PriceOutOfRange {
        /// The rejected price.
        price: f64,
    },

    /// Currency pairs need a non-empty identifier.
    #[error("currency pair cannot be empty")]
    EmptyPair,

    /// Bars need `low <= open, close <= high`.
    #[error("inconsistent OHLC for {date}: low {low} high {high}")]
    InconsistentBar {
        /// Bar date.
        date: chrono::NaiveDate,
        /// Reported low.
        low: f64,
        /// Reported high.
        high: f64,
    },

    /// Unknown price type label.
    #[error("unknown price type: {0}")]
    UnknownPriceType(String),
}
