//! # Corebill Payments Core
//!
//! Canonical, processor-agnostic payment model shared by the gateway
//! abstraction layer and its callers:
//! - Money as `rust_decimal::Decimal` with an ISO 4217 currency
//! - Canonical payment/refund request and response values
//! - The normalized status vocabulary with an explicit `Unknown` fallback
//! - Processor and capability identifiers
//!
//! Processor-specific wire encodings (integer minor units, lower-case
//! currency codes, native status strings) never appear in this crate; they
//! live behind the normalization functions of the `adapters` crate.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod currency;
pub mod error;
pub mod status;
pub mod types;

pub use currency::CurrencyCode;
pub use error::{Error, Result};
pub use status::{NormalizedStatus, PaymentStatus};
pub use types::*;
