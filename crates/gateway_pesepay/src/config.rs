//! Gateway configuration
//!
//! Credentials and endpoints for the PesePay integration, loaded from the
//! environment by the API layer and passed in at construction.

use serde::Deserialize;

/// Configuration for the PesePay adapter
#[derive(Debug, Clone, Deserialize)]
pub struct PesepayConfig {
    /// Base URL of the payments engine
    /// (e.g. "https://api.pesepay.com/api/payments-engine/v1")
    pub base_url: String,

    /// Integration key sent as the Authorization header
    pub integration_key: String,

    /// Shared secret for webhook HMAC signatures
    pub webhook_secret: String,

    /// URL the gateway posts webhook results to
    pub result_url: String,

    /// URL the payer is returned to after checkout
    pub return_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PesepayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.pesepay.com/api/payments-engine/v1".to_string(),
            integration_key: String::new(),
            webhook_secret: String::new(),
            result_url: String::new(),
            return_url: String::new(),
            timeout_secs: 10,
        }
    }
}

impl PesepayConfig {
    /// Whether credentials are present
    pub fn is_configured(&self) -> bool {
        !self.integration_key.is_empty() && !self.base_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PesepayConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.is_configured());
    }
}
