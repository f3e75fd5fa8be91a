//! Regional processor connector

use crate::config::GatewayConfig;
use crate::connector::{dispatch, rejection, ProcessorConnector};
use crate::normalize::{decode_amount, encode_amount, encode_currency, normalize_status};
use crate::retry::RetryPolicy;
use crate::transport::HttpTransport;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use payments_core::{
    Capability, NormalizedStatus, PaymentQr, PaymentRequest, PaymentResponse, Processor,
    RefundRequest, RefundResponse,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

const CAPABILITIES: &[Capability] = &[
    Capability::Charge,
    Capability::Refund,
    Capability::PaymentQr,
];

/// Connector for the regional processor.
///
/// Wire format: integer thousandth-unit amounts (canonical × 1000),
/// upper-case currency codes, status strings under a `state` key.
pub struct RegionalConnector {
    config: GatewayConfig,
    transport: HttpTransport,
    retry: RetryPolicy,
}

impl RegionalConnector {
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
        let raw = body.get("state").and_then(Value::as_str).unwrap_or_default();
        let normalized = normalize_status(Processor::Regional, raw);
        if normalized.needs_review() {
            warn!(processor = %Processor::Regional, raw_status = raw, "unmapped processor status");
        }
        normalized
    }
}

#[async_trait]
impl ProcessorConnector for RegionalConnector {
    fn processor(&self) -> Processor {
        Processor::Regional
    }

    fn name(&self) -> &'static str {
        "regional"
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    async fn charge(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<PaymentResponse> {
        let url = format!("{}/api/charge", self.config.base_url);
        let amount = encode_amount(Processor::Regional, request.amount, &request.currency)?;
        let body = json!({
            "order_ref": request.invoice_id,
            "amount": amount.to_json(),
            "currency": encode_currency(Processor::Regional, &request.currency),
            "branch": request.branch_ref,
        });

        info!(invoice_id = %request.invoice_id, processor = %Processor::Regional, "sending charge");
        let response = dispatch(&self.transport, &self.retry, &self.config, &url, &body, cancel)
            .await?;

        if !response.is_success() {
            return Err(rejection(Processor::Regional, &response, "state"));
        }

        let normalized = self.normalized_from(&response.body);
        // pending charges may come back with a scan-to-pay string attached
        let qr_code = response
            .body
            .get("qr_string")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(PaymentResponse {
            transaction_id: Uuid::now_v7(),
            status: normalized.to_payment_status(),
            processor_status: normalized,
            processor_transaction_id: response
                .body
                .get("txn_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            raw_payload: Some(response.body),
            redirect_url: None,
            qr_code,
            needs_review: normalized.needs_review(),
        })
    }

    async fn refund(
        &self,
        request: &RefundRequest,
        cancel: &CancellationToken,
    ) -> Result<RefundResponse> {
        let url = format!("{}/api/refund", self.config.base_url);
        let amount = encode_amount(Processor::Regional, request.amount, &request.currency)?;
        let body = json!({
            "txn_id": request.processor_transaction_id,
            "amount": amount.to_json(),
            "reason": request.reason,
        });

        info!(invoice_id = %request.invoice_id, processor = %Processor::Regional, "sending refund");
        let response = dispatch(&self.transport, &self.retry, &self.config, &url, &body, cancel)
            .await?;

        if !response.is_success() {
            return Err(rejection(Processor::Regional, &response, "state"));
        }

        if let Some(echoed) = response.body.get("amount") {
            match decode_amount(Processor::Regional, echoed, &request.currency) {
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
                .get("refund_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            refund_amount: request.amount,
            remaining_amount: request.original_amount - request.amount,
            completed_at: Utc::now(),
            raw_payload: Some(response.body),
            needs_review: normalized.needs_review(),
        })
    }

    async fn payment_qr(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<PaymentQr> {
        let url = format!("{}/api/qr", self.config.base_url);
        let amount = encode_amount(Processor::Regional, request.amount, &request.currency)?;
        let body = json!({
            "order_ref": request.invoice_id,
            "amount": amount.to_json(),
            "currency": encode_currency(Processor::Regional, &request.currency),
        });

        info!(invoice_id = %request.invoice_id, processor = %Processor::Regional, "creating payment QR");
        let response = dispatch(&self.transport, &self.retry, &self.config, &url, &body, cancel)
            .await?;

        if !response.is_success() {
            return Err(rejection(Processor::Regional, &response, "state"));
        }

        let qr_code = response
            .body
            .get("qr_string")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Rejected {
                status_code: response.status,
                body: response.body.to_string(),
                status: NormalizedStatus::Unknown,
            })?;

        Ok(PaymentQr { qr_code })
    }
}
