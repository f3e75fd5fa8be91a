//! Wallet provider connector

use crate::config::GatewayConfig;
use crate::connector::{dispatch, rejection, ProcessorConnector};
use crate::normalize::{decode_amount, encode_amount, encode_currency, normalize_status};
use crate::retry::RetryPolicy;
use crate::transport::HttpTransport;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use payments_core::{
    Capability, CurrencyCode, NormalizedStatus, PaymentLink, PaymentQr, PaymentRequest,
    PaymentResponse, Processor, RefundRequest, RefundResponse,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

const CAPABILITIES: &[Capability] = &[
    Capability::Charge,
    Capability::Refund,
    Capability::PaymentLink,
    Capability::PaymentQr,
];

/// Connector for the wallet provider.
///
/// Wire format: decimal major-unit amounts nested as
/// `{"value": "...", "currency_code": "..."}` with lower-case currency
/// codes, SCREAMING status strings.
pub struct WalletConnector {
    config: GatewayConfig,
    transport: HttpTransport,
    retry: RetryPolicy,
}

impl WalletConnector {
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

    fn wire_amount(&self, request_amount: Decimal, currency: &CurrencyCode) -> Result<Value> {
        let amount = encode_amount(Processor::Wallet, request_amount, currency)?;
        Ok(json!({
            "value": amount.to_json(),
            "currency_code": encode_currency(Processor::Wallet, currency),
        }))
    }

    fn normalized_from(&self, body: &Value) -> NormalizedStatus {
        let raw = body.get("status").and_then(Value::as_str).unwrap_or_default();
        let normalized = normalize_status(Processor::Wallet, raw);
        if normalized.needs_review() {
            warn!(processor = %Processor::Wallet, raw_status = raw, "unmapped processor status");
        }
        normalized
    }
}

#[async_trait]
impl ProcessorConnector for WalletConnector {
    fn processor(&self) -> Processor {
        Processor::Wallet
    }

    fn name(&self) -> &'static str {
        "wallet"
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    async fn charge(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<PaymentResponse> {
        let url = format!("{}/v2/payments", self.config.base_url);
        let body = json!({
            "invoice_id": request.invoice_id,
            "amount": self.wire_amount(request.amount, &request.currency)?,
            "description": request.description,
            "customer": request.customer_ref,
        });

        info!(invoice_id = %request.invoice_id, processor = %Processor::Wallet, "sending charge");
        let response = dispatch(&self.transport, &self.retry, &self.config, &url, &body, cancel)
            .await?;

        if !response.is_success() {
            return Err(rejection(Processor::Wallet, &response, "status"));
        }

        let normalized = self.normalized_from(&response.body);
        // a CREATED charge carries the approval page for the payer
        let redirect_url = response
            .body
            .get("approve_url")
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
        let url = format!("{}/v2/refunds", self.config.base_url);
        let body = json!({
            "capture_id": request.processor_transaction_id,
            "amount": self.wire_amount(request.amount, &request.currency)?,
            "note": request.reason,
        });

        info!(invoice_id = %request.invoice_id, processor = %Processor::Wallet, "sending refund");
        let response = dispatch(&self.transport, &self.retry, &self.config, &url, &body, cancel)
            .await?;

        if !response.is_success() {
            return Err(rejection(Processor::Wallet, &response, "status"));
        }

        if let Some(echoed) = response.body.pointer("/amount/value") {
            match decode_amount(Processor::Wallet, echoed, &request.currency) {
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
        let url = format!("{}/v2/checkout-links", self.config.base_url);
        let body = json!({
            "invoice_id": request.invoice_id,
            "amount": self.wire_amount(request.amount, &request.currency)?,
        });

        info!(invoice_id = %request.invoice_id, processor = %Processor::Wallet, "creating payment link");
        let response = dispatch(&self.transport, &self.retry, &self.config, &url, &body, cancel)
            .await?;

        if !response.is_success() {
            return Err(rejection(Processor::Wallet, &response, "status"));
        }

        let redirect_url = response
            .body
            .get("approve_url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Rejected {
                status_code: response.status,
                body: response.body.to_string(),
                status: NormalizedStatus::Unknown,
            })?;

        Ok(PaymentLink { redirect_url })
    }

    async fn payment_qr(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<PaymentQr> {
        let url = format!("{}/v2/qr-codes", self.config.base_url);
        let body = json!({
            "invoice_id": request.invoice_id,
            "amount": self.wire_amount(request.amount, &request.currency)?,
        });

        info!(invoice_id = %request.invoice_id, processor = %Processor::Wallet, "creating payment QR");
        let response = dispatch(&self.transport, &self.retry, &self.config, &url, &body, cancel)
            .await?;

        if !response.is_success() {
            return Err(rejection(Processor::Wallet, &response, "status"));
        }

        let qr_code = response
            .body
            .get("qr_data")
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
