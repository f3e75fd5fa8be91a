//! Error types for the canonical payment model

use thiserror::Error;

/// Result type for payments-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Canonical model errors
#[derive(Error, Debug)]
pub enum Error {
    /// Currency code is not a valid ISO 4217 alpha-3 code
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Amount does not fit the canonical representation
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}
