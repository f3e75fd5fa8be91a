//! Canonical status vocabularies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical outcome of an adapter call, consumed by invoice/order workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment completed on the processor
    Success,
    /// Payment in flight or awaiting confirmation
    Pending,
    /// Payment terminally failed
    Failed,
}

/// Normalized processor status.
///
/// Every processor status string maps into this vocabulary through a finite
/// per-processor table. A string outside the table maps to `Unknown` — never
/// silently coerced to a conventional default, so new or unhandled processor
/// states surface for manual review instead of masquerading as `Failed` or
/// `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizedStatus {
    /// Funds movement confirmed by the processor
    Completed,
    /// Accepted but not final
    Pending,
    /// Declined or errored terminally
    Failed,
    /// Voided before completion
    Cancelled,
    /// Status string not present in the processor's mapping table
    Unknown,
}

impl NormalizedStatus {
    /// Collapse into the 3-value canonical outcome.
    ///
    /// `Unknown` is treated as `Pending` for business purposes; callers see
    /// the `needs_review` flag on the response and reconcile manually.
    pub fn to_payment_status(self) -> PaymentStatus {
        match self {
            NormalizedStatus::Completed => PaymentStatus::Success,
            NormalizedStatus::Pending | NormalizedStatus::Unknown => PaymentStatus::Pending,
            NormalizedStatus::Failed | NormalizedStatus::Cancelled => PaymentStatus::Failed,
        }
    }

    /// True exactly for the `Unknown` fallback
    pub fn needs_review(self) -> bool {
        matches!(self, NormalizedStatus::Unknown)
    }
}

impl fmt::Display for NormalizedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NormalizedStatus::Completed => "completed",
            NormalizedStatus::Pending => "pending",
            NormalizedStatus::Failed => "failed",
            NormalizedStatus::Cancelled => "cancelled",
            NormalizedStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
