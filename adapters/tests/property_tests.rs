//! Property-based tests for the normalization tables
//!
//! The amount and currency mappings must be lossless round trips within
//! each processor's documented precision, for all inputs — not just the
//! handful of literals in the unit tests.

use adapters::normalize::{
    decode_amount, decode_currency, encode_amount, encode_currency, normalize_status,
};
use payments_core::{CurrencyCode, NormalizedStatus, Processor};
use proptest::prelude::*;
use rust_decimal::Decimal;

proptest! {
    /// Property: cent-precision amounts survive the card encoding (2 dp)
    #[test]
    fn card_amount_round_trips(cents in 0i64..100_000_000i64) {
        let amount = Decimal::new(cents, 2);
        let currency = CurrencyCode::new("USD").unwrap();

        let wire = encode_amount(Processor::Card, amount, &currency).unwrap();
        let back = decode_amount(Processor::Card, &wire.to_json(), &currency).unwrap();

        prop_assert_eq!(back, amount);
    }

    /// Property: thousandth-precision amounts survive the regional encoding (3 dp)
    #[test]
    fn regional_amount_round_trips(millis in 0i64..100_000_000i64) {
        let amount = Decimal::new(millis, 3);
        let currency = CurrencyCode::new("KWD").unwrap();

        let wire = encode_amount(Processor::Regional, amount, &currency).unwrap();
        let back = decode_amount(Processor::Regional, &wire.to_json(), &currency).unwrap();

        prop_assert_eq!(back, amount);
    }

    /// Property: the wallet passes canonical decimals through unchanged
    #[test]
    fn wallet_amount_round_trips(cents in 0i64..100_000_000i64) {
        let amount = Decimal::new(cents, 2);
        let currency = CurrencyCode::new("USD").unwrap();

        let wire = encode_amount(Processor::Wallet, amount, &currency).unwrap();
        let back = decode_amount(Processor::Wallet, &wire.to_json(), &currency).unwrap();

        prop_assert_eq!(back, amount);
    }

    /// Property: currency casing round-trips case-insensitively everywhere
    #[test]
    fn currency_round_trips(code in "[A-Za-z]{3}") {
        let currency = CurrencyCode::new(&code).unwrap();
        for processor in [Processor::Card, Processor::Wallet, Processor::Regional] {
            let encoded = encode_currency(processor, &currency);
            let back = decode_currency(processor, &encoded).unwrap();
            prop_assert!(back.as_str().eq_ignore_ascii_case(&code));
        }
    }

    /// Property: arbitrary status strings never map to a definitive state
    /// unless they are in a processor's table
    #[test]
    fn unknown_statuses_stay_unknown(raw in "[a-z_]{1,20}") {
        for processor in [Processor::Card, Processor::Wallet, Processor::Regional] {
            let known = match processor {
                Processor::Card => [
                    "succeeded", "refunded", "processing", "requires_action",
                    "pending", "failed", "canceled",
                ].contains(&raw.as_str()),
                // wallet statuses are upper-case, lower-case input is never known
                Processor::Wallet => false,
                Processor::Regional => [
                    "captured", "processed", "authorized", "created",
                    "pending", "failed", "cancelled",
                ].contains(&raw.as_str()),
            };
            let status = normalize_status(processor, &raw);
            if !known {
                prop_assert_eq!(status, NormalizedStatus::Unknown);
            } else {
                prop_assert_ne!(status, NormalizedStatus::Unknown);
            }
        }
    }
}
