//! # Order Types
//!
//! Cart, line item, order and checkout session types.
//!
//! A [`Cart`] is the validated, per-request view of what the customer is
//! buying. It is turned into provider line items before a checkout session
//! is requested, and into a persisted [`Order`] only once that session exists.

use crate::error::{ShopError, ShopResult};
use crate::money::{Currency, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest unit amount, in minor units, a hosted checkout will accept
pub const MAX_UNIT_AMOUNT: i64 = 99_999_999;

/// An item as submitted by the storefront: a product name and a decimal price.
///
/// Any other fields the client sends (quantity, image, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    pub price: f64,
}

impl CartItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    fn validate(&self, index: usize, currency: Currency) -> ShopResult<()> {
        if self.name.trim().is_empty() {
            return Err(ShopError::Validation(format!(
                "items[{}].name is required",
                index
            )));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ShopError::Validation(format!(
                "items[{}].price must be a non-negative number",
                index
            )));
        }
        if currency.to_smallest_unit(self.price) > MAX_UNIT_AMOUNT {
            return Err(ShopError::Validation(format!(
                "items[{}].price exceeds the maximum of {}",
                index,
                Price::from_minor(MAX_UNIT_AMOUNT, currency).display()
            )));
        }
        Ok(())
    }
}

/// A line item sent to the payment provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name
    pub name: String,

    /// Unit price in minor units
    pub unit_price: Price,

    /// Always 1: cart entries are never aggregated
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item from a cart entry
    pub fn from_cart_item(item: &CartItem, currency: Currency) -> Self {
        Self {
            name: item.name.clone(),
            unit_price: Price::new(item.price, currency),
            quantity: 1,
        }
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> Price {
        Price::from_minor(
            self.unit_price.amount.saturating_mul(i64::from(self.quantity)),
            self.unit_price.currency,
        )
    }
}

/// Checkout mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    /// One-time payment
    Payment,
}

impl Default for CheckoutMode {
    fn default() -> Self {
        CheckoutMode::Payment
    }
}

/// A validated cart ready to be checked out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Unique cart ID, also used as the provider idempotency key
    pub id: String,

    /// Items exactly as submitted
    pub items: Vec<CartItem>,

    /// One line item per submitted item
    pub line_items: Vec<LineItem>,

    /// Currency (same for all items)
    pub currency: Currency,

    /// Checkout mode
    #[serde(default)]
    pub mode: CheckoutMode,

    /// Customer email, prefilled on the hosted page
    pub customer_email: String,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Validate submitted items and build the line items.
    ///
    /// Requires at least one item, a non-blank name and a finite
    /// non-negative price no larger than [`MAX_UNIT_AMOUNT`] on every item,
    /// a total that fits in minor units, and a non-blank email.
    pub fn from_items(
        items: Vec<CartItem>,
        customer_email: &str,
        currency: Currency,
    ) -> ShopResult<Self> {
        if items.is_empty() {
            return Err(ShopError::Validation("Order has no items".to_string()));
        }
        for (i, item) in items.iter().enumerate() {
            item.validate(i, currency)?;
        }

        let customer_email = customer_email.trim();
        if customer_email.is_empty() {
            return Err(ShopError::missing("email"));
        }

        let line_items: Vec<LineItem> = items
            .iter()
            .map(|item| LineItem::from_cart_item(item, currency))
            .collect();

        if checked_total(&line_items).is_none() {
            return Err(ShopError::Validation("Order total is too large".to_string()));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            items,
            line_items,
            currency,
            mode: CheckoutMode::Payment,
            customer_email: customer_email.to_string(),
            created_at: Utc::now(),
        })
    }

    /// Sum of the line items in minor units
    pub fn total(&self) -> Price {
        let amount = checked_total(&self.line_items).unwrap_or(i64::MAX);
        Price::from_minor(amount, self.currency)
    }

    /// Get item count
    pub fn item_count(&self) -> u32 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }
}

fn checked_total(line_items: &[LineItem]) -> Option<i64> {
    line_items
        .iter()
        .try_fold(0i64, |acc, item| acc.checked_add(item.total().amount))
}

/// Server-assigned order identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Payment status of a persisted order.
///
/// Only `Pending -> Paid` is a legal transition; nothing in this service
/// performs it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Paid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Paid => "Paid",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// A persisted order record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,

    /// Items as submitted at checkout
    pub items: Vec<CartItem>,

    /// Formatted total, e.g. "£9.99"
    pub total: String,

    pub customer_email: String,

    /// Provider session id, the correlation key for payment confirmation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_session_id: Option<String>,

    #[serde(default)]
    pub status: OrderStatus,

    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build a pending order for a cart whose checkout session was created
    pub fn for_session(cart: &Cart, session: &CheckoutSession) -> Self {
        Self::pending(cart, Some(session.session_id.clone()))
    }

    /// Build a pending order with no payment step
    pub fn direct(cart: &Cart) -> Self {
        Self::pending(cart, None)
    }

    fn pending(cart: &Cart, payment_session_id: Option<String>) -> Self {
        Self {
            id: OrderId::new(),
            items: cart.items.clone(),
            total: cart.total().display(),
            customer_email: cart.customer_email.clone(),
            payment_session_id,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// A checkout session created by a payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Our cart ID
    pub cart_id: String,

    /// Provider name (e.g., "stripe")
    pub provider: String,

    /// URL to redirect customer to for payment
    pub checkout_url: String,

    /// When the session expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    /// Create a new checkout session
    pub fn new(
        session_id: impl Into<String>,
        cart_id: impl Into<String>,
        provider: impl Into<String>,
        checkout_url: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            cart_id: cart_id.into(),
            provider: provider.into(),
            checkout_url: checkout_url.into(),
            expires_at: None,
            created_at: Utc::now(),
        }
    }
}
