//! # shop-db
//!
//! Persistence backends for the shopfront [`Store`](shop_core::Store) trait.
//!
//! - [`MemoryStore`] - process-local, for tests and local development
//! - [`PgStore`] - PostgreSQL via `sqlx`, with embedded migrations

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgStore, PgStoreOptions};
