//! Card network connector

use crate::config::GatewayConfig;
use crate::connector::{dispatch, rejection, ProcessorConnector};
use crate::normalize::{decode_amount, encode_amount, encode_currency, normalize_status};
use crate::retry::RetryPolicy;
use crate::transport::HttpTransport;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use payments_core::{
    Capability, NormalizedStatus, PaymentLink, PaymentRequest, PaymentResponse, Processor,
    RefundRequest, RefundResponse,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

const CAPABILITIES: &[Capability] = &[
    Capability::Charge,
    Capability::Refund,
    Capability::PaymentLink,
];

/// Connector for the card network processor.
///
/// Wire format: integer minor-unit amounts (cents), upper-case currency
/// codes, lower-case status strings.
pub struct CardConnector {
    config: GatewayConfig,
    transport: HttpTransport,
    retry: RetryPolicy,
}

impl CardConnector {
    /// Create a connector; fails on invalid configuration
    pub fn new(config: GatewayConfig, transport: HttpTransport) -> Result<Self> {
        config.validate()?;
        let retry = RetryPolicy::from_config(&config);
        Ok(Self {
            config,
            transport,
            retry,
        })
    }

    fn normalized_from(&self, body: &Value) -> NormalizedStatus {
        let raw = body.get("status").and_then(Value::as_str).unwrap_or_default();
        let normalized = normalize_status(Processor::Card, raw);
        if normalized.needs_review() {
            warn!(processor = %Processor::Card, raw_status = raw, "unmapped processor status");
        }
        normalized
    }
}

#[async_trait]
impl ProcessorConnector for CardConnector {
    fn processor(&self) -> Processor {
        Processor::Card
    }

    fn name(&self) -> &'static str {
        "card"
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    async fn charge(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<PaymentResponse> {
        let url = format!("{}/v1/charges", self.config.base_url);
        let amount = encode_amount(Processor::Card, request.amount, &request.currency)?;
        let body = json!({
            "amount": amount.to_json(),
            "currency": encode_currency(Processor::Card, &request.currency),
            "reference": request.invoice_id,
            "description": request.description,
            "metadata": request.metadata,
        });

        info!(invoice_id = %request.invoice_id, processor = %Processor::Card, "sending charge");
        let response = dispatch(&self.transport, &self.retry, &self.config, &url, &body, cancel)
            .await?;

        if !response.is_success() {
            return Err(rejection(Processor::Card, &response, "status"));
        }

        let normalized = self.normalized_from(&response.body);
        // a requires_action charge carries the hosted page for the payer
        let redirect_url = response
            .body
            .get("redirect_url")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(PaymentResponse {
            transaction_id: Uuid::now_v7(),
            status: normalized.to_payment_status(),
            processor_status: normalized,
            processor_transaction_id: response
                .body
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string),
            raw_payload: Some(response.body),
            redirect_url,
            qr_code: None,
            needs_review: normalized.needs_review(),
        })
    }

    async fn refund(
        &self,
        request: &RefundRequest,
        cancel: &CancellationToken,
    ) -> Result<RefundResponse> {
        let url = format!("{}/v1/refunds", self.config.base_url);
        let amount = encode_amount(Processor::Card, request.amount, &request.currency)?;
        let body = json!({
            "charge": request.processor_transaction_id,
            "amount": amount.to_json(),
            "reason": request.reason,
        });

        info!(invoice_id = %request.invoice_id, processor = %Processor::Card, "sending refund");
        let response = dispatch(&self.transport, &self.retry, &self.config, &url, &body, cancel)
            .await?;

        if !response.is_success() {
            return Err(rejection(Processor::Card, &response, "status"));
        }

        if let Some(echoed) = response.body.get("amount") {
            match decode_amount(Processor::Card, echoed, &request.currency) {
                Ok(amount) if amount != request.amount => {
                    warn!(
                        invoice_id = %request.invoice_id,
                        requested = %request.amount,
                        echoed = %amount,
                        "processor echoed a different refund amount"
                    );
                }
                _ => {}
            }
        }

        let normalized = self.normalized_from(&response.body);
        Ok(RefundResponse {
            transaction_id: Uuid::now_v7(),
            status: normalized.to_payment_status(),
            processor_status: normalized,
            processor_refund_id: response
                .body
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string),
            refund_amount: request.amount,
            remaining_amount: request.original_amount - request.amount,
            completed_at: Utc::now(),
            raw_payload: Some(response.body),
            needs_review: normalized.needs_review(),
        })
    }

    async fn payment_link(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<PaymentLink> {
        let url = format!("{}/v1/payment_links", self.config.base_url);
        let amount = encode_amount(Processor::Card, request.amount, &request.currency)?;
        let body = json!({
            "amount": amount.to_json(),
            "currency": encode_currency(Processor::Card, &request.currency),
            "reference": request.invoice_id,
        });

        info!(invoice_id = %request.invoice_id, processor = %Processor::Card, "creating payment link");
        let response = dispatch(&self.transport, &self.retry, &self.config, &url, &body, cancel)
            .await?;

        if !response.is_success() {
            return Err(rejection(Processor::Card, &response, "status"));
        }

        let redirect_url = response
            .body
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            // an accepted answer without a link is unusable; surface the body
            .ok_or_else(|| Error::Rejected {
                status_code: response.status,
                body: response.body.to_string(),
                status: NormalizedStatus::Unknown,
            })?;

        Ok(PaymentLink { redirect_url })
    }
}
