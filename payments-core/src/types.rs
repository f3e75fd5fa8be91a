//! Canonical request/response types for the gateway abstraction

use crate::currency::CurrencyCode;
use crate::status::{NormalizedStatus, PaymentStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =========================================================================
// PROCESSOR IDENTIFIERS
// =========================================================================

/// Configured external payment processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Processor {
    /// Card network processor (integer minor-unit amounts)
    Card,
    /// Wallet provider (decimal major-unit amounts)
    Wallet,
    /// Regional processor (thousandth-unit integer amounts)
    Regional,
}

impl std::fmt::Display for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Processor::Card => write!(f, "CARD"),
            Processor::Wallet => write!(f, "WALLET"),
            Processor::Regional => write!(f, "REGIONAL"),
        }
    }
}

/// Optional operation a processor may or may not support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// Direct charge
    Charge,
    /// Reversal of a prior charge
    Refund,
    /// Hosted payment-link creation
    PaymentLink,
    /// Payment QR code creation
    PaymentQr,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Charge => write!(f, "charge"),
            Capability::Refund => write!(f, "refund"),
            Capability::PaymentLink => write!(f, "payment_link"),
            Capability::PaymentQr => write!(f, "payment_qr"),
        }
    }
}

// =========================================================================
// PAYMENT TYPES
// =========================================================================

/// Which side of the ledger the invoice sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceKind {
    /// Customer-facing sale invoice
    Sale,
    /// Supplier-facing purchase invoice
    Purchase,
}

/// Caller's hint for the customer's preferred payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodHint {
    /// Card payment
    Card,
    /// Wallet balance
    Wallet,
    /// Bank transfer
    BankTransfer,
    /// QR-initiated payment
    Qr,
}

/// Charge request, constructed by the caller and consumed once.
///
/// The amount is a base-currency decimal at the currency's standard
/// fractional digits (e.g. "12.50" USD); input validation (non-empty ids,
/// positive amounts) happens in the controller layer above.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Invoice identifier
    pub invoice_id: String,
    /// Invoice kind
    pub invoice_kind: InvoiceKind,
    /// Canonical decimal amount
    pub amount: Decimal,
    /// ISO 4217 currency
    pub currency: CurrencyCode,
    /// Target processor
    pub processor: Processor,
    /// Payment method hint
    pub method: Option<PaymentMethodHint>,
    /// Free-text description forwarded to the processor
    pub description: Option<String>,
    /// Opaque caller metadata
    pub metadata: Option<serde_json::Value>,
    /// Customer reference
    pub customer_ref: Option<String>,
    /// Supplier reference (purchase-side payouts)
    pub supplier_ref: Option<String>,
    /// Branch reference
    pub branch_ref: Option<String>,
}

/// Outcome of a charge, produced exactly once per successful adapter call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// Internal transaction id, generated by the adapter layer (UUIDv7)
    pub transaction_id: Uuid,
    /// Canonical outcome
    pub status: PaymentStatus,
    /// Normalized processor status, `Unknown` never masked
    pub processor_status: NormalizedStatus,
    /// Processor-assigned transaction id
    pub processor_transaction_id: Option<String>,
    /// Raw processor payload (opaque, logged not parsed further)
    pub raw_payload: Option<serde_json::Value>,
    /// Redirect URL when the processor returned one
    pub redirect_url: Option<String>,
    /// QR payload when the processor returned one
    pub qr_code: Option<String>,
    /// True when the processor status fell outside the mapping table
    pub needs_review: bool,
}

/// Reversal request, mirror of [`PaymentRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequest {
    /// Invoice identifier
    pub invoice_id: String,
    /// Processor transaction id of the original charge
    pub processor_transaction_id: String,
    /// Amount to refund
    pub amount: Decimal,
    /// Amount of the original charge (source of truth for remaining math)
    pub original_amount: Decimal,
    /// ISO 4217 currency
    pub currency: CurrencyCode,
    /// Target processor
    pub processor: Processor,
    /// Refund reason forwarded to the processor
    pub reason: Option<String>,
}

/// Outcome of a refund
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundResponse {
    /// Internal transaction id, generated by the adapter layer (UUIDv7)
    pub transaction_id: Uuid,
    /// Canonical outcome
    pub status: PaymentStatus,
    /// Normalized processor status
    pub processor_status: NormalizedStatus,
    /// Processor-assigned refund id
    pub processor_refund_id: Option<String>,
    /// Amount refunded by this call
    pub refund_amount: Decimal,
    /// Amount still refundable on the original transaction
    pub remaining_amount: Decimal,
    /// Completion timestamp
    pub completed_at: DateTime<Utc>,
    /// Raw processor payload
    pub raw_payload: Option<serde_json::Value>,
    /// True when the processor status fell outside the mapping table
    pub needs_review: bool,
}

/// Result of payment-link creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLink {
    /// Hosted checkout URL
    pub redirect_url: String,
}

/// Result of payment-QR creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentQr {
    /// QR payload
    pub qr_code: String,
}
