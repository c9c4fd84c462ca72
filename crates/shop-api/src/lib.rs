//! # shop-api
//!
//! HTTP API layer for the shopfront backend.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Combined login/register with session tokens
//! - Hosted checkout creation and pending-order recording
//! - Contact inquiry intake
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/auth/login` | Log in or register |
//! | POST | `/api/create-checkout-session` | Create checkout session |
//! | POST | `/api/inquiry` | Store contact inquiry |
//! | POST | `/api/orders` | Direct order (`ENABLE_DIRECT_ORDERS=true`) |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
