//! Currency codes, pairs, and exchange rates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::time::{now, Timestamp};

/// A currency identifier, normalized to trimmed uppercase (e.g. "USD").
///
/// Normalization is purely syntactic; no ISO 4217 membership check is
/// performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a code from a known-good value. Trims and uppercases.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Parse untrusted input. Fails if the code is empty after
    /// normalization.
    pub fn parse(input: &str) -> Result<Self, InvalidCurrencyCode> {
        let code = Self::new(input);
        if code.0.is_empty() {
            return Err(InvalidCurrencyCode {
                input: input.to_string(),
            });
        }
        Ok(code)
    }

    /// Get the normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Error for currency codes that are empty after normalization.
#[derive(Debug, Clone, Error)]
#[error("invalid currency code: {input:?}")]
pub struct InvalidCurrencyCode {
    /// The rejected raw input.
    pub input: String,
}

/// An ordered currency pair. `base` is the currency being priced, `quote`
/// the currency it is priced in; a pair and its inverse are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Source currency.
    pub base: CurrencyCode,
    /// Target currency.
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// Get the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// An exchange rate: units of `quote` per one unit of `base`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// The currency pair this rate prices.
    pub pair: CurrencyPair,
    /// Rate value, always positive.
    pub rate: Decimal,
    /// When this rate was fetched from its source.
    pub fetched_at: Timestamp,
    /// Identifier of the provider that produced the rate.
    pub source: String,
}

impl ExchangeRate {
    /// Create a new rate stamped with the current time.
    pub fn new(pair: CurrencyPair, rate: Decimal, source: impl Into<String>) -> Self {
        Self {
            pair,
            rate,
            fetched_at: now(),
            source: source.into(),
        }
    }

    /// Convert an amount of `base` into `quote` at this rate.
    pub fn convert(&self, amount: Decimal) -> Decimal {
        amount * self.rate
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.pair, self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_trims_and_uppercases() {
        assert_eq!(CurrencyCode::new(" usd ").as_str(), "USD");
        assert_eq!(CurrencyCode::new("Rub").as_str(), "RUB");
    }

    #[test]
    fn parse_accepts_messy_input() {
        let code = CurrencyCode::parse("\teur\n").unwrap();
        assert_eq!(code.as_str(), "EUR");
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(CurrencyCode::parse("").is_err());
        assert!(CurrencyCode::parse("   ").is_err());
    }

    #[test]
    fn pair_display_and_inverse() {
        let pair = CurrencyPair::new(CurrencyCode::new("USD"), CurrencyCode::new("RUB"));
        assert_eq!(pair.to_string(), "USD/RUB");
        assert_eq!(pair.inverse().to_string(), "RUB/USD");
        assert_ne!(pair, pair.inverse());
    }

    #[test]
    fn rate_converts_amounts() {
        let pair = CurrencyPair::new(CurrencyCode::new("USD"), CurrencyCode::new("RUB"));
        let rate = ExchangeRate::new(pair, dec!(90.0), "test");
        assert_eq!(rate.convert(dec!(100)), dec!(9000.0));
        assert_eq!(rate.convert(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(rate.convert(dec!(-2)), dec!(-180.0));
    }
}
