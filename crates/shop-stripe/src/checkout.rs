//! # Stripe Checkout Sessions
//!
//! Implementation of Stripe Checkout Sessions API.
//! This is the only payment flow the shopfront uses.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use shop_core::{
    Cart, CheckoutMode, CheckoutSession, PaymentStrategy, ShopError, ShopResult,
};
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session strategy
///
/// Uses Stripe's hosted checkout page, so card details never reach us.
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutStrategy {
    /// Create a new Stripe checkout strategy
    pub fn new(config: StripeConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ShopError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Convert our checkout mode to Stripe's mode
    fn stripe_mode(mode: CheckoutMode) -> &'static str {
        match mode {
            CheckoutMode::Payment => "payment",
        }
    }

    /// Build the form body for `POST /v1/checkout/sessions`
    fn form_params(cart: &Cart, success_url: &str, cancel_url: &str) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), Self::stripe_mode(cart.mode).to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
            ("customer_email".to_string(), cart.customer_email.clone()),
        ];

        for (i, item) in cart.line_items.iter().enumerate() {
            form_params.push((
                format!("line_items[{}][price_data][currency]", i),
                item.unit_price.currency.as_str().to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_price.amount.to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form_params.push(("metadata[cart_id]".to_string(), cart.id.clone()));
        form_params
    }
}

#[async_trait]
impl PaymentStrategy for StripeCheckoutStrategy {
    #[instrument(skip(self, cart), fields(cart_id = %cart.id, items = cart.line_items.len()))]
    async fn create_checkout(
        &self,
        cart: &Cart,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutSession> {
        if cart.line_items.is_empty() {
            return Err(ShopError::Validation("Order has no items".to_string()));
        }

        let form_params = Self::form_params(cart, success_url, cancel_url);

        debug!(
            "Creating Stripe checkout session: {} items, total={}",
            cart.line_items.len(),
            cart.total().display()
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &cart.id)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(ShopError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(ShopError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let session_response: StripeCheckoutSessionResponse =
            serde_json::from_str(&body).map_err(|e| {
                ShopError::Serialization(format!("Failed to parse Stripe response: {}", e))
            })?;

        let checkout_url = session_response.url.ok_or_else(|| ShopError::ProviderError {
            provider: PROVIDER.to_string(),
            message: format!("session {} has no redirect url", session_response.id),
        })?;

        info!(
            "Created Stripe checkout session: id={}, url={}",
            session_response.id, checkout_url
        );

        let mut session = CheckoutSession::new(session_response.id, &cart.id, PROVIDER, checkout_url);
        session.expires_at = session_response
            .expires_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

        Ok(session)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shop_core::{CartItem, Currency};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cart(items: Vec<CartItem>) -> Cart {
        Cart::from_items(items, "b@y.com", Currency::GBP).unwrap()
    }

    fn strategy(server: &MockServer) -> StripeCheckoutStrategy {
        let config = StripeConfig::new("sk_test_abc").with_api_base_url(server.uri());
        StripeCheckoutStrategy::new(config).unwrap()
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_stripe_mode_conversion() {
        assert_eq!(
            StripeCheckoutStrategy::stripe_mode(CheckoutMode::Payment),
            "payment"
        );
    }

    #[test]
    fn test_form_params_one_line_item_per_cart_entry() {
        let cart = cart(vec![
            CartItem::new("Widget", 9.99),
            CartItem::new("Widget", 9.99),
            CartItem::new("Gadget", 0.5),
        ]);
        let params = StripeCheckoutStrategy::form_params(&cart, "https://s", "https://c");

        assert_eq!(param(&params, "mode"), Some("payment"));
        assert_eq!(param(&params, "payment_method_types[0]"), Some("card"));
        assert_eq!(param(&params, "customer_email"), Some("b@y.com"));
        assert_eq!(param(&params, "success_url"), Some("https://s"));
        assert_eq!(param(&params, "cancel_url"), Some("https://c"));

        for i in 0..3 {
            assert_eq!(param(&params, &format!("line_items[{}][quantity]", i)), Some("1"));
            assert_eq!(
                param(&params, &format!("line_items[{}][price_data][currency]", i)),
                Some("gbp")
            );
        }
        assert_eq!(param(&params, "line_items[0][price_data][unit_amount]"), Some("999"));
        assert_eq!(param(&params, "line_items[1][price_data][unit_amount]"), Some("999"));
        assert_eq!(param(&params, "line_items[2][price_data][unit_amount]"), Some("50"));
        assert_eq!(
            param(&params, "line_items[2][price_data][product_data][name]"),
            Some("Gadget")
        );
        assert!(param(&params, "line_items[3][quantity]").is_none());
    }

    #[tokio::test]
    async fn test_create_checkout_success() {
        let server = MockServer::start().await;
        let cart = cart(vec![CartItem::new("Widget", 9.99)]);

        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header("Authorization", "Bearer sk_test_abc"))
            .and(header("Idempotency-Key", cart.id.as_str()))
            .and(body_string_contains("mode=payment"))
            .and(body_string_contains("customer_email=b%40y.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_test_123",
                "url": "https://checkout.stripe.com/c/pay/cs_test_123",
                "expires_at": 1_900_000_000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = strategy(&server)
            .create_checkout(&cart, "https://shop/success.html", "https://shop/cancel.html")
            .await
            .unwrap();

        assert_eq!(session.session_id, "cs_test_123");
        assert_eq!(session.checkout_url, "https://checkout.stripe.com/c/pay/cs_test_123");
        assert_eq!(session.cart_id, cart.id);
        assert_eq!(session.provider, "stripe");
        assert_eq!(session.expires_at.map(|t| t.timestamp()), Some(1_900_000_000));
    }

    #[tokio::test]
    async fn test_create_checkout_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "message": "Invalid email address: b@y",
                    "type": "invalid_request_error"
                }
            })))
            .mount(&server)
            .await;

        let err = strategy(&server)
            .create_checkout(&cart(vec![CartItem::new("Widget", 9.99)]), "s", "c")
            .await
            .unwrap_err();

        match err {
            ShopError::ProviderError { provider, message } => {
                assert_eq!(provider, "stripe");
                assert_eq!(message, "Invalid email address: b@y");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_checkout_unparseable_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = strategy(&server)
            .create_checkout(&cart(vec![CartItem::new("Widget", 1.0)]), "s", "c")
            .await
            .unwrap_err();

        assert!(err.is_dependency_failure());
        assert!(err.to_string().contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_session_without_url_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "cs_test_9" })))
            .mount(&server)
            .await;

        let err = strategy(&server)
            .create_checkout(&cart(vec![CartItem::new("Widget", 1.0)]), "s", "c")
            .await
            .unwrap_err();

        assert!(matches!(err, ShopError::ProviderError { .. }));
    }
}
