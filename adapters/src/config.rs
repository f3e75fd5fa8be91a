//! Per-processor gateway configuration

use crate::{Error, Result};
use std::time::Duration;

/// Static configuration for one external processor.
///
/// Supplied by the caller at adapter construction, read-only afterwards.
/// This layer never reads environment variables; configuration arrives
/// programmatically from the application's startup wiring.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Processor API base URL, no trailing slash
    pub base_url: String,
    /// Bearer credential for the `Authorization` header
    pub credential: String,
    /// Hard deadline per outbound attempt
    pub timeout: Duration,
    /// Total attempts per call, first attempt included
    pub max_attempts: u32,
}

impl GatewayConfig {
    /// Create a config with the default timeout and retry budget
    pub fn new(base_url: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credential: credential.into(),
            timeout: Duration::from_secs(crate::DEFAULT_REQUEST_TIMEOUT_SECONDS),
            max_attempts: crate::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Validate at construction; a bad config must never become a runtime surprise
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config("base_url is empty".to_string()));
        }
        if self.credential.is_empty() {
            return Err(Error::Config("credential is empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be non-zero".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GatewayConfig::new("https://api.example.com", "sk_test");
        assert_eq!(cfg.max_attempts, crate::DEFAULT_MAX_ATTEMPTS);
        assert_eq!(
            cfg.timeout,
            Duration::from_secs(crate::DEFAULT_REQUEST_TIMEOUT_SECONDS)
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let mut cfg = GatewayConfig::new("", "sk_test");
        assert!(cfg.validate().is_err());

        cfg = GatewayConfig::new("https://api.example.com", "");
        assert!(cfg.validate().is_err());

        cfg = GatewayConfig::new("https://api.example.com", "sk_test");
        cfg.max_attempts = 0;
        assert!(cfg.validate().is_err());

        cfg = GatewayConfig::new("https://api.example.com", "sk_test");
        cfg.timeout = Duration::ZERO;
        assert!(cfg.validate().is_err());
    }
}
