//! # shop-core
//!
//! Core types and traits for the shopfront backend.
//!
//! This crate provides:
//! - `User`, `Order` and `Inquiry` records
//! - `Cart` and `LineItem` for the checkout flow
//! - `Currency` and `Price` for minor-unit money math
//! - `PaymentStrategy` trait for hosted-checkout providers
//! - `Store` trait for the persistence collaborator
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{Cart, CartItem, Currency, Order};
//!
//! let cart = Cart::from_items(vec![CartItem::new("Widget", 9.99)], "b@y.com", Currency::GBP)?;
//!
//! // Ask the provider for a hosted session first
//! let session = strategy.create_checkout(&cart, &urls.success_url(), &urls.cancel_url()).await?;
//!
//! // Only then persist the pending order
//! store.insert_order(&Order::for_session(&cart, &session)).await?;
//!
//! // Redirect user to session.checkout_url
//! ```

pub mod error;
pub mod inquiry;
pub mod money;
pub mod order;
pub mod store;
pub mod strategy;
pub mod user;

// Re-exports for convenience
pub use error::{ShopError, ShopResult};
pub use inquiry::{Inquiry, InquiryForm, InquiryId};
pub use money::{Currency, Price};
pub use order::{
    Cart, CartItem, CheckoutMode, CheckoutSession, LineItem, Order, OrderId, OrderStatus,
    MAX_UNIT_AMOUNT,
};
pub use store::{BoxedStore, Store};
pub use strategy::{BoxedPaymentStrategy, CheckoutUrls, PaymentStrategy};
pub use user::{User, UserId};
