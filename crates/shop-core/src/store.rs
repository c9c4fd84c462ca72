//! # Store Trait
//!
//! The persistence collaborator. Three append-mostly collections (users,
//! orders, inquiries) accessed by insert and find-by-email only.
//!
//! Implementations live in `shop-db`: an in-memory store for tests and
//! local development, and PostgreSQL for deployments.

use crate::error::ShopResult;
use crate::inquiry::Inquiry;
use crate::order::Order;
use crate::user::User;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Store: Send + Sync {
    /// Find a user by exact email match.
    async fn find_user_by_email(&self, email: &str) -> ShopResult<Option<User>>;

    /// Insert a new user.
    ///
    /// Returns `ShopError::Conflict` if the email is already taken. This is
    /// the only guard against two concurrent registrations of one email.
    async fn insert_user(&self, user: &User) -> ShopResult<()>;

    /// Insert a new order.
    async fn insert_order(&self, order: &Order) -> ShopResult<()>;

    /// Insert a new inquiry.
    async fn insert_inquiry(&self, inquiry: &Inquiry) -> ShopResult<()>;

    /// Backend name (for logging and health output).
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared store (dynamic dispatch)
pub type BoxedStore = Arc<dyn Store>;
