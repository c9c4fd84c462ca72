//! # In-Memory Store
//!
//! Process-local store used by tests and local development. Uniqueness of
//! user emails is checked under the write lock, so concurrent registrations
//! race exactly like they do against a database constraint.

use async_trait::async_trait;
use shop_core::{Inquiry, Order, ShopError, ShopResult, Store, User};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Collections {
    /// Keyed by email
    users: HashMap<String, User>,
    orders: Vec<Order>,
    inquiries: Vec<Inquiry>,
}

/// In-memory implementation of [`Store`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }

    /// Snapshot of stored orders, in insertion order
    pub async fn orders(&self) -> Vec<Order> {
        self.inner.read().await.orders.clone()
    }

    /// Snapshot of stored inquiries, in insertion order
    pub async fn inquiries(&self) -> Vec<Inquiry> {
        self.inner.read().await.inquiries.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> ShopResult<Option<User>> {
        Ok(self.inner.read().await.users.get(email).cloned())
    }

    async fn insert_user(&self, user: &User) -> ShopResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&user.email) {
            return Err(ShopError::Conflict(format!("user {}", user.email)));
        }
        inner.users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn insert_order(&self, order: &Order) -> ShopResult<()> {
        self.inner.write().await.orders.push(order.clone());
        Ok(())
    }

    async fn insert_inquiry(&self, inquiry: &Inquiry) -> ShopResult<()> {
        self.inner.write().await.inquiries.push(inquiry.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
