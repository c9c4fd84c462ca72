//! # Stripe Configuration
//!
//! Configuration management for Stripe integration.
//! The secret key is loaded from the environment; there is no fallback.

use shop_core::ShopError;
use std::env;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// HTTP timeout for provider calls, in seconds
    pub timeout_secs: u64,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShopError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("STRIPE_SECRET_KEY")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ShopError::Configuration("STRIPE_SECRET_KEY not set".to_string()))?;

        if !secret_key.starts_with("sk_test_") && !secret_key.starts_with("sk_live_") {
            return Err(ShopError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_ or sk_live_".to_string(),
            ));
        }

        let mut config = Self::new(secret_key);
        if let Some(url) = lookup("STRIPE_API_BASE_URL").filter(|u| !u.is_empty()) {
            config = config.with_api_base_url(url);
        }
        Ok(config)
    }

    /// Create config with an explicit key (for testing)
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: 30,
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Check if using live keys
    pub fn is_live_mode(&self) -> bool {
        self.secret_key.starts_with("sk_live_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_key_modes() {
        let config = StripeConfig::new("sk_test_abc123");
        assert!(config.is_test_mode());
        assert!(!config.is_live_mode());

        let config = StripeConfig::new("sk_live_abc123");
        assert!(!config.is_test_mode());
        assert!(config.is_live_mode());
    }

    #[test]
    fn test_auth_header() {
        let config = StripeConfig::new("sk_test_abc123");
        assert_eq!(config.auth_header(), "Bearer sk_test_abc123");
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let result = StripeConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ShopError::Configuration(_))));

        let result = StripeConfig::from_lookup(lookup_from(&[("STRIPE_SECRET_KEY", "")]));
        assert!(matches!(result, Err(ShopError::Configuration(_))));
    }

    #[test]
    fn test_malformed_key_rejected() {
        let result = StripeConfig::from_lookup(lookup_from(&[("STRIPE_SECRET_KEY", "pk_test_x")]));
        assert!(matches!(result, Err(ShopError::Configuration(_))));
    }

    #[test]
    fn test_api_base_url_override() {
        let config = StripeConfig::from_lookup(lookup_from(&[
            ("STRIPE_SECRET_KEY", "sk_test_abc"),
            ("STRIPE_API_BASE_URL", "http://127.0.0.1:12111"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:12111");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }
}
