//! # Shopfront
//!
//! Storefront backend: accounts, Stripe checkout and contact inquiries.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export JWT_SECRET=$(openssl rand -hex 32)
//! export DATABASE_URL=postgres://localhost/shopfront
//!
//! # Run the server
//! shopfront
//! ```

use shop_api::{routes, AppConfig, AppState};
use shop_core::{PaymentStrategy, Store};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    init_tracing(config.is_production());

    print_banner();

    let addr = config.socket_addr()?;
    let is_prod = config.is_production();

    info!("Environment: {}", config.environment);

    let state = AppState::from_env(config).await?;

    info!("Store backend: {}", state.store.backend_name());
    info!("Payment provider: {}", state.payments.provider_name());
    if state.config.direct_orders_enabled {
        info!("Direct orders enabled at POST /api/orders");
    }

    let app = routes::create_router(state);

    info!("🛒 Shopfront starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("💳 Checkout: POST http://{}/api/create-checkout-session", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Human-readable logs in development, JSON lines in production
fn init_tracing(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json_layer = json.then(|| fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn print_banner() {
    println!(
        r#"
  🛒 Shopfront 🛒
  ━━━━━━━━━━━━━━━━━━━━━━━
  Storefront backend
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
