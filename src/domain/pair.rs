//! Currency pair identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Currency pair such as `USD/LYD`.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair(String);

impl CurrencyPair {
    /// Create a pair, rejecting blank identifiers.
    pub fn try_new(pair: impl Into<String>) -> Result<Self, DomainError> {
        let pair = pair.into();
        let trimmed = pair.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyPair);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// The US dollar against the Libyan dinar.
    #[must_use]
    pub fn usd_lyd() -> Self {
        Self("USD/LYD".into())
    }

    /// The euro against the Libyan dinar.
    #[must_use]
    pub fn eur_lyd() -> Self {
        Self("EUR/LYD".into())
    }

    /// Get the pair as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base currency code (the part before the slash).
    pub fn base(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl TryFrom<&str> for CurrencyPair {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let pair = CurrencyPair::try_new(" usd/lyd ").unwrap();
        assert_eq!(pair, CurrencyPair::usd_lyd());
        assert_eq!(pair.base(), "USD");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(CurrencyPair::try_new("  "), Err(DomainError::EmptyPair));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&CurrencyPair::eur_lyd()).unwrap();
        assert_eq!(json, r#""EUR/LYD""#);
        let back: CurrencyPair = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CurrencyPair::eur_lyd());
    }
}
