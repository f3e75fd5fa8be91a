//! Error types for gateway adapters

use payments_core::{Capability, NormalizedStatus, Processor};
use thiserror::Error;

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Gateway adapter errors
#[derive(Error, Debug)]
pub enum Error {
    /// Processor does not implement the requested operation; never attempted
    #[error("Processor {processor} does not support {capability}")]
    CapabilityUnsupported {
        /// Target processor
        processor: Processor,
        /// Requested capability
        capability: Capability,
    },

    /// Deadline exceeded on an outbound call (specialization of unavailability)
    #[error("Gateway timeout after {elapsed_ms}ms")]
    Timeout {
        /// Elapsed time when the deadline fired
        elapsed_ms: u64,
    },

    /// Connection-level failure or upstream 5xx, surfaced after retry exhaustion
    #[error("Gateway unavailable after {attempts} attempt(s): {reason}")]
    Unavailable {
        /// Attempts performed
        attempts: u32,
        /// Last observed failure
        reason: String,
    },

    /// Processor answered and declined; not retried
    #[error("Gateway rejected request with HTTP {status_code} (normalized: {status})")]
    Rejected {
        /// Raw HTTP status code from the processor
        status_code: u16,
        /// Raw response body
        body: String,
        /// Normalized processor status
        status: NormalizedStatus,
    },

    /// Caller cancelled the in-flight call
    #[error("Call cancelled by caller")]
    Cancelled,

    /// Amount or currency could not be translated to or from the
    /// processor's wire encoding
    #[error("Wire encoding error: {0}")]
    Encoding(String),

    /// Invalid gateway configuration, raised at construction
    #[error("Configuration error: {0}")]
    Config(String),

    /// Processor not present in the registry
    #[error("Processor {0} is not configured")]
    UnknownProcessor(Processor),
}

impl Error {
    /// Whether the retry policy may try again.
    ///
    /// Only transport-level failures qualify: timeouts, connection errors
    /// and upstream 5xx. A definitive business rejection is final.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Timeout { .. } | Error::Unavailable { .. })
    }

    /// Whether the error signals processor unavailability (timeout included)
    pub fn is_unavailable(&self) -> bool {
        self.is_transient()
    }

    /// Record the true attempt total once the retry budget is spent
    pub(crate) fn with_attempts(mut self, total: u32) -> Self {
        if let Error::Unavailable { attempts, .. } = &mut self {
            *attempts = total;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(Error::Timeout { elapsed_ms: 100 }.is_transient());
        assert!(Error::Unavailable {
            attempts: 1,
            reason: "connection refused".into()
        }
        .is_transient());

        assert!(!Error::Rejected {
            status_code: 402,
            body: String::new(),
            status: NormalizedStatus::Failed
        }
        .is_transient());
        assert!(!Error::CapabilityUnsupported {
            processor: Processor::Card,
            capability: Capability::PaymentQr
        }
        .is_transient());
        assert!(!Error::Cancelled.is_transient());
    }

    #[test]
    fn test_timeout_counts_as_unavailable() {
        assert!(Error::Timeout { elapsed_ms: 50 }.is_unavailable());
        assert!(!Error::Rejected {
            status_code: 400,
            body: String::new(),
            status: NormalizedStatus::Unknown
        }
        .is_unavailable());
    }
}
