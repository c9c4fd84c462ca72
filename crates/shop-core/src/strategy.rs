//! # Payment Strategy Trait
//!
//! Strategy pattern trait for hosted-checkout payment providers.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          PaymentStrategy (trait)            │
//! │  ├── create_checkout()                      │
//! │  └── provider_name()                        │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!          ┌────────────┴────────────┐
//!  ┌───────┴────────┐       ┌────────┴───────┐
//!  │ StripeCheckout │       │  test doubles  │
//!  │    Strategy    │       │                │
//!  └────────────────┘       └────────────────┘
//! ```

use crate::error::ShopResult;
use crate::order::{Cart, CheckoutSession};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment provider implementations.
///
/// The application never sees card data: it asks the provider for a hosted
/// session and redirects the customer to the returned URL.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a checkout session and return the redirect URL.
    ///
    /// # Arguments
    /// * `cart` - The validated cart to check out
    /// * `success_url` - URL to redirect after successful payment
    /// * `cancel_url` - URL to redirect if customer cancels
    async fn create_checkout(
        &self,
        cart: &Cart,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a boxed payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Redirect URLs handed to the provider, templated from the frontend base URL
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Public frontend base URL (e.g., "https://shop.example.com")
    pub base_url: String,
    /// Success page path
    pub success_path: String,
    /// Cancel page path
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            success_path: "/success.html".to_string(),
            cancel_path: "/cancel.html".to_string(),
        }
    }

    /// Success URL carrying the provider's session id placeholder
    pub fn success_url(&self) -> String {
        format!(
            "{}{}?session_id={{CHECKOUT_SESSION_ID}}",
            self.base_url, self.success_path
        )
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_urls() {
        let urls = CheckoutUrls::new("https://shop.example.com");

        assert_eq!(
            urls.success_url(),
            "https://shop.example.com/success.html?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(urls.cancel_url(), "https://shop.example.com/cancel.html");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let urls = CheckoutUrls::new("https://shop.example.com/");
        assert_eq!(urls.cancel_url(), "https://shop.example.com/cancel.html");
    }

    #[test]
    fn test_local_default() {
        assert_eq!(
            CheckoutUrls::default().cancel_url(),
            "http://localhost:3000/cancel.html"
        );
    }
}
