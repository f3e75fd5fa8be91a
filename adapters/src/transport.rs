//! Outbound HTTP call primitive with deadline-based cancellation

use crate::{Error, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Raw processor answer.
///
/// Any HTTP response, 2xx through 5xx, is data rather than an exception;
/// classification into rejected/unavailable happens above this layer. Only
/// connection failures and deadline expiry surface as errors here.
#[derive(Debug, Clone)]
pub struct WireResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, `Value::String` when not valid JSON
    pub body: Value,
}

impl WireResponse {
    /// Whether the processor accepted the request
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the processor itself failed (retry candidate)
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// HTTP transport shared by all connectors of one registry
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create the shared client.
    ///
    /// Per-attempt deadlines are enforced around each call, not on the
    /// client builder, so one transport can serve processors with different
    /// timeouts.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("http client: {}", e)))?;
        Ok(Self { client })
    }

    /// One outbound POST: JSON body, bearer credential, hard deadline.
    ///
    /// Exactly one cancellation scope exists per call; dropping the in-flight
    /// future on deadline expiry or caller cancellation aborts the request on
    /// every exit path.
    pub async fn post_json(
        &self,
        url: &str,
        credential: &str,
        body: &Value,
        deadline: Duration,
        cancel: &CancellationToken,
    ) -> Result<WireResponse> {
        let started = Instant::now();

        let call = async {
            let response = self
                .client
                .post(url)
                .bearer_auth(credential)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .json(body)
                .send()
                .await
                .map_err(|e| Error::Unavailable {
                    attempts: 1,
                    reason: e.to_string(),
                })?;

            let status = response.status().as_u16();
            let text = response.text().await.map_err(|e| Error::Unavailable {
                attempts: 1,
                reason: format!("reading body: {}", e),
            })?;

            let body = if text.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).unwrap_or(Value::String(text))
            };

            Ok(WireResponse { status, body })
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            outcome = tokio::time::timeout(deadline, call) => match outcome {
                Ok(result) => result,
                Err(_) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    warn!(url, elapsed_ms, "outbound call exceeded deadline");
                    Err(Error::Timeout { elapsed_ms })
                }
            },
        }
    }
}
