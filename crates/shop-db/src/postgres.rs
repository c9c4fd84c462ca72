//! # PostgreSQL Store
//!
//! `sqlx`-backed implementation of [`Store`]. The schema lives in
//! `crates/shop-db/migrations/` and is applied by [`PgStore::migrate`].
//!
//! ## Tables
//!
//! - `users` - storefront accounts (`email` is `UNIQUE`)
//! - `orders` - pending/paid orders, items as JSONB
//! - `inquiries` - contact form submissions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shop_core::{
    CartItem, Inquiry, Order, ShopError, ShopResult, Store, User, UserId,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Pool settings for [`PgStore::connect`]
#[derive(Debug, Clone)]
pub struct PgStoreOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PgStoreOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

/// PostgreSQL implementation of [`Store`]
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect a pool to `database_url`.
    pub async fn connect(database_url: &str, options: PgStoreOptions) -> ShopResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(storage_error)?;

        Ok(Self { pool })
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> ShopResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ShopError::Storage(format!("migration failed: {}", e)))?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> ShopResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert_user(&self, user: &User) -> ShopResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id.0)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return ShopError::Conflict(format!("user {}", user.email));
                }
            }
            storage_error(e)
        })?;

        Ok(())
    }

    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn insert_order(&self, order: &Order) -> ShopResult<()> {
        let items: &Vec<CartItem> = &order.items;
        sqlx::query(
            r#"
            INSERT INTO orders (id, items, total, customer_email, payment_session_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id.0)
        .bind(Json(items))
        .bind(&order.total)
        .bind(&order.customer_email)
        .bind(order.payment_session_id.as_deref())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    #[instrument(skip(self, inquiry), fields(inquiry_id = %inquiry.id))]
    async fn insert_inquiry(&self, inquiry: &Inquiry) -> ShopResult<()> {
        sqlx::query(
            r#"
            INSERT INTO inquiries (id, name, email, message, service, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(inquiry.id.0)
        .bind(&inquiry.name)
        .bind(&inquiry.email)
        .bind(&inquiry.message)
        .bind(inquiry.service.as_deref())
        .bind(inquiry.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn storage_error(e: sqlx::Error) -> ShopError {
    ShopError::Storage(e.to_string())
}
