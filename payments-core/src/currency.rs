//! ISO 4217 currency codes with fractional-digit metadata

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies with zero fractional digits (whole-unit currencies)
const ZERO_EXPONENT: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

/// Currencies with three fractional digits
const THREE_EXPONENT: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// ISO 4217 alpha-3 currency code, stored upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code, accepting any casing
    pub fn new(code: &str) -> Result<Self> {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidCurrency(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Upper-case alpha-3 code
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Standard fractional digits for the currency (2 unless listed otherwise)
    pub fn exponent(&self) -> u32 {
        if ZERO_EXPONENT.contains(&self.0.as_str()) {
            0
        } else if THREE_EXPONENT.contains(&self.0.as_str()) {
            3
        } else {
            2
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let c = CurrencyCode::new("usd").unwrap();
        assert_eq!(c.as_str(), "USD");
    }

    #[test]
    fn test_rejects_non_alpha3() {
        assert!(CurrencyCode::new("US").is_err());
        assert!(CurrencyCode::new("USDT").is_err());
        assert!(CurrencyCode::new("U5D").is_err());
    }

    #[test]
    fn test_exponents() {
        assert_eq!(CurrencyCode::new("USD").unwrap().exponent(), 2);
        assert_eq!(CurrencyCode::new("JPY").unwrap().exponent(), 0);
        assert_eq!(CurrencyCode::new("KWD").unwrap().exponent(), 3);
    }
}
