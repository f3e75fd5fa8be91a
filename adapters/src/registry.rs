//! Processor registry (public face of the gateway abstraction)

use crate::card::CardConnector;
use crate::config::GatewayConfig;
use crate::connector::ProcessorConnector;
use crate::regional::RegionalConnector;
use crate::transport::HttpTransport;
use crate::wallet::WalletConnector;
use crate::{Error, Result};
use payments_core::{
    Capability, PaymentLink, PaymentQr, PaymentRequest, PaymentResponse, Processor, RefundRequest,
    RefundResponse,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Registry of configured processors.
///
/// Built once at startup from per-processor [`GatewayConfig`] values; a bad
/// config fails construction, not a live call. The connector map is
/// immutable afterwards, so the registry is safe for concurrent use without
/// synchronization — invocations are fully independent, and any at-most-once
/// semantics per invoice belong to the workflow layer above.
pub struct GatewayRegistry {
    connectors: HashMap<Processor, Arc<dyn ProcessorConnector>>,
}

impl GatewayRegistry {
    /// Instantiate one connector per configured processor
    pub fn new(configs: HashMap<Processor, GatewayConfig>) -> Result<Self> {
        let transport = HttpTransport::new()?;
        let mut connectors: HashMap<Processor, Arc<dyn ProcessorConnector>> = HashMap::new();
        for (processor, config) in configs {
            let connector: Arc<dyn ProcessorConnector> = match processor {
                Processor::Card => Arc::new(CardConnector::new(config, transport.clone())?),
                Processor::Wallet => Arc::new(WalletConnector::new(config, transport.clone())?),
                Processor::Regional => Arc::new(RegionalConnector::new(config, transport.clone())?),
            };
            connectors.insert(processor, connector);
        }
        Ok(Self { connectors })
    }

    /// Whether a configured processor implements a capability.
    ///
    /// Callers invoking an optional capability should check here first, or
    /// be prepared to catch [`Error::CapabilityUnsupported`].
    pub fn supports(&self, processor: Processor, capability: Capability) -> bool {
        self.connectors
            .get(&processor)
            .map(|c| c.capabilities().contains(&capability))
            .unwrap_or(false)
    }

    fn connector(
        &self,
        processor: Processor,
        capability: Capability,
    ) -> Result<&Arc<dyn ProcessorConnector>> {
        let connector = self
            .connectors
            .get(&processor)
            .ok_or(Error::UnknownProcessor(processor))?;
        // fail closed before any network activity
        if !connector.capabilities().contains(&capability) {
            return Err(Error::CapabilityUnsupported {
                processor,
                capability,
            });
        }
        Ok(connector)
    }

    /// Charge through the request's target processor
    pub async fn charge(&self, request: &PaymentRequest) -> Result<PaymentResponse> {
        self.charge_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Charge with a caller-supplied cancellation scope
    pub async fn charge_with_cancel(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<PaymentResponse> {
        self.connector(request.processor, Capability::Charge)?
            .charge(request, cancel)
            .await
    }

    /// Refund through the request's target processor
    pub async fn refund(&self, request: &RefundRequest) -> Result<RefundResponse> {
        self.refund_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Refund with a caller-supplied cancellation scope
    pub async fn refund_with_cancel(
        &self,
        request: &RefundRequest,
        cancel: &CancellationToken,
    ) -> Result<RefundResponse> {
        self.connector(request.processor, Capability::Refund)?
            .refund(request, cancel)
            .await
    }

    /// Create a hosted payment link (optional capability)
    pub async fn payment_link(&self, request: &PaymentRequest) -> Result<PaymentLink> {
        self.payment_link_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Payment link with a caller-supplied cancellation scope
    pub async fn payment_link_with_cancel(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<PaymentLink> {
        self.connector(request.processor, Capability::PaymentLink)?
            .payment_link(request, cancel)
            .await
    }

    /// Create a payment QR code (optional capability)
    pub async fn payment_qr(&self, request: &PaymentRequest) -> Result<PaymentQr> {
        self.payment_qr_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Payment QR with a caller-supplied cancellation scope
    pub async fn payment_qr_with_cancel(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<PaymentQr> {
        self.connector(request.processor, Capability::PaymentQr)?
            .payment_qr(request, cancel)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payments_core::{CurrencyCode, InvoiceKind};
    use rust_decimal_macros::dec;

    fn configs() -> HashMap<Processor, GatewayConfig> {
        let mut configs = HashMap::new();
        for processor in [Processor::Card, Processor::Wallet, Processor::Regional] {
            configs.insert(
                processor,
                GatewayConfig::new("http://127.0.0.1:9", "test-credential"),
            );
        }
        configs
    }

    fn request(processor: Processor) -> PaymentRequest {
        PaymentRequest {
            invoice_id: "inv-1".to_string(),
            invoice_kind: InvoiceKind::Sale,
            amount: dec!(12.50),
            currency: CurrencyCode::new("USD").unwrap(),
            processor,
            method: None,
            description: None,
            metadata: None,
            customer_ref: None,
            supplier_ref: None,
            branch_ref: None,
        }
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let mut configs = configs();
        configs.insert(Processor::Card, GatewayConfig::new("", "credential"));
        assert!(matches!(
            GatewayRegistry::new(configs),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_capability_matrix() {
        let registry = GatewayRegistry::new(configs()).unwrap();
        for processor in [Processor::Card, Processor::Wallet, Processor::Regional] {
            assert!(registry.supports(processor, Capability::Charge));
            assert!(registry.supports(processor, Capability::Refund));
        }
        assert!(registry.supports(Processor::Card, Capability::PaymentLink));
        assert!(!registry.supports(Processor::Card, Capability::PaymentQr));
        assert!(registry.supports(Processor::Wallet, Capability::PaymentQr));
        assert!(!registry.supports(Processor::Regional, Capability::PaymentLink));
    }

    #[tokio::test]
    async fn test_unconfigured_processor_is_an_error() {
        let mut configs = configs();
        configs.remove(&Processor::Regional);
        let registry = GatewayRegistry::new(configs).unwrap();

        let result = registry.charge(&request(Processor::Regional)).await;
        assert!(matches!(
            result,
            Err(Error::UnknownProcessor(Processor::Regional))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_capability_fails_before_any_call() {
        // base_url points nowhere; a network attempt would fail differently
        let registry = GatewayRegistry::new(configs()).unwrap();

        let result = registry.payment_qr(&request(Processor::Card)).await;
        assert!(matches!(
            result,
            Err(Error::CapabilityUnsupported {
                processor: Processor::Card,
                capability: Capability::PaymentQr,
            })
        ));
    }
}
