//! # Routes
//!
//! Axum router configuration for the shopfront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - POST /api/auth/login - Combined login/register
/// - POST /api/create-checkout-session - Create hosted checkout
/// - POST /api/inquiry - Store a contact inquiry
/// - POST /api/orders - Direct order, only when enabled in config
/// - GET  /health, GET / - Health check
pub fn create_router(state: AppState) -> Router {
    // The storefront is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api_routes = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/create-checkout-session", post(handlers::create_checkout_session))
        .route("/inquiry", post(handlers::create_inquiry));

    if state.config.direct_orders_enabled {
        api_routes = api_routes.route("/orders", post(handlers::create_order));
    }

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
