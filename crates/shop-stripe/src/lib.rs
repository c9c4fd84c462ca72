//! # shop-stripe
//!
//! Stripe payment strategy for the shopfront backend.
//!
//! **StripeCheckoutStrategy** wraps the Checkout Sessions API:
//! - Dynamic line items, one per cart entry
//! - Customer email prefill
//! - Idempotency key per cart
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_stripe::StripeCheckoutStrategy;
//! use shop_core::PaymentStrategy;
//!
//! // Create strategy from environment
//! let strategy = StripeCheckoutStrategy::from_env()?;
//!
//! // Create checkout session
//! let session = strategy.create_checkout(
//!     &cart,
//!     "https://example.com/success.html?session_id={CHECKOUT_SESSION_ID}",
//!     "https://example.com/cancel.html",
//! ).await?;
//!
//! // Redirect user to session.checkout_url
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
