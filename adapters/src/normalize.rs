//! Pure translation between the canonical model and processor wire formats
//!
//! Three independent, processor-keyed mappings: amount encoding, currency
//! code casing, and status vocabulary. Each is total over the `Processor`
//! enum, so adding a processor is an additive change here — no edits to
//! retry or transport logic. Processor-specific representations exist only
//! inside these functions and never leak across adapter boundaries.

use crate::{Error, Result};
use payments_core::{CurrencyCode, NormalizedStatus, Processor};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

/// How a processor encodes money on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountEncoding {
    /// Integer minor units (canonical × 100, rounded)
    MinorUnits,
    /// Decimal major units, passed through at the currency's scale
    MajorDecimal,
    /// Integer thousandths (canonical × 1000, rounded)
    MilliUnits,
}

/// Which casing a processor requires for ISO currency codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyCase {
    /// Upper-case codes
    Upper,
    /// Lower-case codes
    Lower,
}

/// A processor's wire-format profile (one record per processor)
#[derive(Debug, Clone, Copy)]
pub struct ProcessorProfile {
    /// Amount encoding rule
    pub amount_encoding: AmountEncoding,
    /// Currency casing rule
    pub currency_case: CurrencyCase,
}

/// Profile lookup, exhaustive over the processor enum
pub fn profile(processor: Processor) -> ProcessorProfile {
    match processor {
        Processor::Card => ProcessorProfile {
            amount_encoding: AmountEncoding::MinorUnits,
            currency_case: CurrencyCase::Upper,
        },
        Processor::Wallet => ProcessorProfile {
            amount_encoding: AmountEncoding::MajorDecimal,
            currency_case: CurrencyCase::Lower,
        },
        Processor::Regional => ProcessorProfile {
            amount_encoding: AmountEncoding::MilliUnits,
            currency_case: CurrencyCase::Upper,
        },
    }
}

/// Processor-side amount representation, ready for a JSON body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireAmount {
    /// Integer encoding (minor or thousandth units)
    Int(i64),
    /// Decimal string encoding (major units)
    Text(String),
}

impl WireAmount {
    /// JSON value for the outbound body
    pub fn to_json(&self) -> Value {
        match self {
            WireAmount::Int(n) => Value::from(*n),
            WireAmount::Text(s) => Value::from(s.clone()),
        }
    }
}

fn scaled_int(amount: Decimal, factor: i64) -> Result<i64> {
    amount
        .checked_mul(Decimal::from(factor))
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|v| v.to_i64())
        .ok_or_else(|| Error::Encoding(format!("amount {} out of range for x{}", amount, factor)))
}

/// Canonical decimal → processor wire amount
pub fn encode_amount(
    processor: Processor,
    amount: Decimal,
    currency: &CurrencyCode,
) -> Result<WireAmount> {
    match profile(processor).amount_encoding {
        AmountEncoding::MinorUnits => Ok(WireAmount::Int(scaled_int(amount, 100)?)),
        AmountEncoding::MilliUnits => Ok(WireAmount::Int(scaled_int(amount, 1_000)?)),
        AmountEncoding::MajorDecimal => {
            let rounded = amount.round_dp_with_strategy(
                currency.exponent(),
                RoundingStrategy::MidpointAwayFromZero,
            );
            Ok(WireAmount::Text(rounded.to_string()))
        }
    }
}

/// Processor wire amount → canonical decimal.
///
/// Used only when a processor echoes an amount back; the canonical amount
/// held by the caller remains the source of truth for bookkeeping.
pub fn decode_amount(
    processor: Processor,
    value: &Value,
    _currency: &CurrencyCode,
) -> Result<Decimal> {
    let encoding = profile(processor).amount_encoding;
    match encoding {
        AmountEncoding::MinorUnits | AmountEncoding::MilliUnits => {
            let units = value
                .as_i64()
                .ok_or_else(|| Error::Encoding(format!("expected integer amount, got {}", value)))?;
            let divisor = if encoding == AmountEncoding::MinorUnits {
                100
            } else {
                1_000
            };
            Ok(Decimal::from(units) / Decimal::from(divisor))
        }
        AmountEncoding::MajorDecimal => {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(Error::Encoding(format!(
                        "expected decimal amount, got {}",
                        other
                    )))
                }
            };
            Decimal::from_str(&text)
                .map_err(|e| Error::Encoding(format!("parsing {:?}: {}", text, e)))
        }
    }
}

/// Canonical currency → processor casing
pub fn encode_currency(processor: Processor, currency: &CurrencyCode) -> String {
    match profile(processor).currency_case {
        CurrencyCase::Upper => currency.as_str().to_string(),
        CurrencyCase::Lower => currency.as_str().to_ascii_lowercase(),
    }
}

/// Processor currency string → canonical upper-case code
pub fn decode_currency(_processor: Processor, raw: &str) -> Result<CurrencyCode> {
    CurrencyCode::new(raw).map_err(|e| Error::Encoding(e.to_string()))
}

/// Processor status string → normalized status.
///
/// Finite lookup per processor; anything outside the table is exactly
/// `Unknown` so new processor states are flagged instead of coerced.
pub fn normalize_status(processor: Processor, raw: &str) -> NormalizedStatus {
    match processor {
        Processor::Card => match raw {
            "succeeded" | "refunded" => NormalizedStatus::Completed,
            "processing" | "requires_action" | "pending" => NormalizedStatus::Pending,
            "failed" => NormalizedStatus::Failed,
            "canceled" => NormalizedStatus::Cancelled,
            _ => NormalizedStatus::Unknown,
        },
        Processor::Wallet => match raw {
            "COMPLETED" => NormalizedStatus::Completed,
            "CREATED" | "PENDING" => NormalizedStatus::Pending,
            "DENIED" | "FAILED" => NormalizedStatus::Failed,
            "VOIDED" => NormalizedStatus::Cancelled,
            _ => NormalizedStatus::Unknown,
        },
        Processor::Regional => match raw {
            "captured" | "processed" => NormalizedStatus::Completed,
            "authorized" | "created" | "pending" => NormalizedStatus::Pending,
            "failed" => NormalizedStatus::Failed,
            "cancelled" => NormalizedStatus::Cancelled,
            _ => NormalizedStatus::Unknown,
        },
    }
}

/// Every status string a processor's table maps (for table-totality tests)
#[cfg(test)]
pub(crate) fn known_statuses(processor: Processor) -> &'static [&'static str] {
    match processor {
        Processor::Card => &[
            "succeeded",
            "refunded",
            "processing",
            "requires_action",
            "pending",
            "failed",
            "canceled",
        ],
        Processor::Wallet => &["COMPLETED", "CREATED", "PENDING", "DENIED", "FAILED", "VOIDED"],
        Processor::Regional => &[
            "captured",
            "processed",
            "authorized",
            "created",
            "pending",
            "failed",
            "cancelled",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD").unwrap()
    }

    #[test]
    fn test_card_encodes_cents() {
        let wire = encode_amount(Processor::Card, dec!(12.50), &usd()).unwrap();
        assert_eq!(wire, WireAmount::Int(1250));
    }

    #[test]
    fn test_regional_encodes_thousandths() {
        let wire = encode_amount(Processor::Regional, dec!(12.50), &usd()).unwrap();
        assert_eq!(wire, WireAmount::Int(12500));
    }

    #[test]
    fn test_wallet_passes_decimal_through() {
        let wire = encode_amount(Processor::Wallet, dec!(12.50), &usd()).unwrap();
        assert_eq!(wire, WireAmount::Text("12.50".to_string()));
    }

    #[test]
    fn test_wallet_respects_currency_exponent() {
        let jpy = CurrencyCode::new("JPY").unwrap();
        let wire = encode_amount(Processor::Wallet, dec!(1200), &jpy).unwrap();
        assert_eq!(wire, WireAmount::Text("1200".to_string()));

        let kwd = CurrencyCode::new("KWD").unwrap();
        let wire = encode_amount(Processor::Wallet, dec!(3.141), &kwd).unwrap();
        assert_eq!(wire, WireAmount::Text("3.141".to_string()));
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        let wire = encode_amount(Processor::Card, dec!(12.505), &usd()).unwrap();
        assert_eq!(wire, WireAmount::Int(1251));
    }

    #[test]
    fn test_decode_inverts_encode() {
        let amount = dec!(12.50);
        for processor in [Processor::Card, Processor::Wallet, Processor::Regional] {
            let wire = encode_amount(processor, amount, &usd()).unwrap();
            let back = decode_amount(processor, &wire.to_json(), &usd()).unwrap();
            assert_eq!(back, amount, "{}", processor);
        }
    }

    #[test]
    fn test_currency_casing() {
        assert_eq!(encode_currency(Processor::Card, &usd()), "USD");
        assert_eq!(encode_currency(Processor::Wallet, &usd()), "usd");
        assert_eq!(encode_currency(Processor::Regional, &usd()), "USD");

        let back = decode_currency(Processor::Wallet, "usd").unwrap();
        assert_eq!(back, usd());
    }

    #[test]
    fn test_every_table_row_is_mapped() {
        for processor in [Processor::Card, Processor::Wallet, Processor::Regional] {
            for raw in known_statuses(processor) {
                let status = normalize_status(processor, raw);
                assert_ne!(
                    status,
                    NormalizedStatus::Unknown,
                    "{} status {:?} fell out of the table",
                    processor,
                    raw
                );
            }
        }
    }

    #[test]
    fn test_unmapped_status_is_exactly_unknown() {
        for processor in [Processor::Card, Processor::Wallet, Processor::Regional] {
            assert_eq!(
                normalize_status(processor, "definitely_not_a_status"),
                NormalizedStatus::Unknown
            );
            // tables are exact-match; casing outside the table is unknown too
            assert_eq!(
                normalize_status(processor, "SUCCEEDED_X"),
                NormalizedStatus::Unknown
            );
        }
    }

    #[test]
    fn test_card_succeeded_is_completed() {
        assert_eq!(
            normalize_status(Processor::Card, "succeeded"),
            NormalizedStatus::Completed
        );
    }
}
