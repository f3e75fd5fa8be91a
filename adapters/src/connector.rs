//! Processor connector interface

use crate::config::GatewayConfig;
use crate::normalize::normalize_status;
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, WireResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use payments_core::{
    Capability, PaymentLink, PaymentQr, PaymentRequest, PaymentResponse, Processor, RefundRequest,
    RefundResponse,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Processor connector trait.
///
/// One implementation per external processor. `charge` and `refund` are
/// required; the link/QR capabilities default to a typed
/// [`Error::CapabilityUnsupported`] value so a processor without them fails
/// fast and closed — no base-method panic, no network attempt.
#[async_trait]
pub trait ProcessorConnector: Send + Sync {
    /// Which processor this connector talks to
    fn processor(&self) -> Processor;

    /// Human-readable connector name
    fn name(&self) -> &'static str;

    /// Capabilities this processor implements
    fn capabilities(&self) -> &'static [Capability];

    /// Charge against the processor
    async fn charge(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<PaymentResponse>;

    /// Reverse a prior charge
    async fn refund(
        &self,
        request: &RefundRequest,
        cancel: &CancellationToken,
    ) -> Result<RefundResponse>;

    /// Create a hosted payment link
    async fn payment_link(
        &self,
        _request: &PaymentRequest,
        _cancel: &CancellationToken,
    ) -> Result<PaymentLink> {
        Err(Error::CapabilityUnsupported {
            processor: self.processor(),
            capability: Capability::PaymentLink,
        })
    }

    /// Create a payment QR code
    async fn payment_qr(
        &self,
        _request: &PaymentRequest,
        _cancel: &CancellationToken,
    ) -> Result<PaymentQr> {
        Err(Error::CapabilityUnsupported {
            processor: self.processor(),
            capability: Capability::PaymentQr,
        })
    }
}

/// One normalized round trip: retry(transport) with 5xx classified as
/// transient, connection errors and timeouts retried, everything else
/// returned to the connector for interpretation.
///
/// The response handed back is always 2xx–4xx; 5xx responses are converted
/// to transient failures inside the loop and only surface as
/// [`Error::Unavailable`] once the retry budget is spent.
pub(crate) async fn dispatch(
    transport: &HttpTransport,
    retry: &RetryPolicy,
    config: &GatewayConfig,
    url: &str,
    body: &Value,
    cancel: &CancellationToken,
) -> Result<WireResponse> {
    retry
        .run(cancel, |_attempt| {
            let transport = transport.clone();
            let url = url.to_string();
            let credential = config.credential.clone();
            let body = body.clone();
            let timeout = config.timeout;
            let cancel = cancel.clone();
            async move {
                let response = transport
                    .post_json(&url, &credential, &body, timeout, &cancel)
                    .await?;
                if response.is_server_error() {
                    return Err(Error::Unavailable {
                        attempts: 1,
                        reason: format!("upstream HTTP {}", response.status),
                    });
                }
                Ok(response)
            }
        })
        .await
}

/// Build the rejection error for a non-2xx, non-5xx processor answer.
///
/// The raw status code and body travel with the error; the processor's
/// status string (when present under `status_field`) is normalized so the
/// caller can tell a final decline from a pending/unknown state.
pub(crate) fn rejection(processor: Processor, response: &WireResponse, status_field: &str) -> Error {
    let raw_status = response
        .body
        .get(status_field)
        .and_then(Value::as_str)
        .unwrap_or_default();
    Error::Rejected {
        status_code: response.status,
        body: response.body.to_string(),
        status: normalize_status(processor, raw_status),
    }
}
