//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the store, payment strategy, auth service and configuration.

use chrono::Duration;
use shop_auth::{AuthService, PasswordHasher, TokenIssuer, DEFAULT_COST, DEFAULT_TTL_HOURS};
use shop_core::{
    BoxedPaymentStrategy, BoxedStore, CheckoutUrls, Currency, ShopError, ShopResult,
};
use shop_db::{MemoryStore, PgStore, PgStoreOptions};
use shop_stripe::StripeCheckoutStrategy;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public frontend base URL for checkout redirects
    pub frontend_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// PostgreSQL connection string; in-memory store when unset
    pub database_url: Option<String>,
    /// Session token signing secret
    pub jwt_secret: String,
    /// Session token lifetime
    pub token_ttl_hours: i64,
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
    /// Mount `POST /api/orders`
    pub direct_orders_enabled: bool,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> ShopResult<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    ///
    /// `JWT_SECRET` is required; there is no built-in fallback secret.
    pub fn from_lookup<F>(lookup: F) -> ShopResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("JWT_SECRET")
            .ok_or_else(|| ShopError::Configuration("JWT_SECRET not set".to_string()))?;

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(var("PORT"), "PORT", 5000)?,
            frontend_url: var("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            database_url: var("DATABASE_URL"),
            jwt_secret,
            token_ttl_hours: parse_or(var("TOKEN_TTL_HOURS"), "TOKEN_TTL_HOURS", DEFAULT_TTL_HOURS)?,
            bcrypt_cost: parse_or(var("BCRYPT_COST"), "BCRYPT_COST", DEFAULT_COST)?,
            direct_orders_enabled: parse_or(var("ENABLE_DIRECT_ORDERS"), "ENABLE_DIRECT_ORDERS", false)?,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> ShopResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ShopError::Configuration(format!("invalid HOST/PORT: {}", e)))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("frontend_url", &self.frontend_url)
            .field("environment", &self.environment)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("direct_orders_enabled", &self.direct_orders_enabled)
            .finish()
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> ShopResult<T> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ShopError::Configuration(format!("{} has an invalid value: {}", key, v))),
        None => Ok(default),
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Persistence collaborator
    pub store: BoxedStore,
    /// Payment provider
    pub payments: BoxedPaymentStrategy,
    /// Login/register flow
    pub auth: AuthService,
    /// Checkout redirect URLs
    pub urls: CheckoutUrls,
    /// Currency for all carts
    pub currency: Currency,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build state from explicit collaborators
    pub fn new(
        config: AppConfig,
        store: BoxedStore,
        payments: BoxedPaymentStrategy,
    ) -> ShopResult<Self> {
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        let ttl = Duration::try_hours(config.token_ttl_hours).ok_or_else(|| {
            ShopError::Configuration(format!(
                "TOKEN_TTL_HOURS out of range: {}",
                config.token_ttl_hours
            ))
        })?;
        let tokens = TokenIssuer::new(&config.jwt_secret, ttl)?;
        let auth = AuthService::new(store.clone(), hasher, tokens);
        let urls = CheckoutUrls::new(&config.frontend_url);

        Ok(Self {
            store,
            payments,
            auth,
            urls,
            currency: Currency::GBP,
            config: Arc::new(config),
        })
    }

    /// Build state from the environment with the Stripe strategy and the
    /// configured store. Missing secrets fail here, before the server binds.
    pub async fn from_env(config: AppConfig) -> anyhow::Result<Self> {
        let stripe_strategy = StripeCheckoutStrategy::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
        let store = connect_store(&config).await?;

        Ok(Self::new(config, store, Arc::new(stripe_strategy))?)
    }

    /// Success URL with session ID placeholder
    pub fn success_url(&self) -> String {
        self.urls.success_url()
    }

    /// Cancel URL
    pub fn cancel_url(&self) -> String {
        self.urls.cancel_url()
    }
}

/// Pick the store backend from config
async fn connect_store(config: &AppConfig) -> anyhow::Result<BoxedStore> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, PgStoreOptions::default())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
            store.migrate().await?;
            info!("Using PostgreSQL store");
            Ok(Arc::new(store))
        }
        None if config.is_production() => {
            anyhow::bail!("DATABASE_URL must be set in production")
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_core::Store;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-that-is-long-enough-0123456789";

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", SECRET)])).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.bcrypt_cost, 10);
        assert!(config.database_url.is_none());
        assert!(!config.direct_orders_enabled);
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_jwt_secret_fails_fast() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap_err();
        assert!(matches!(err, ShopError::Configuration(_)));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", SECRET), ("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("HOST", "0.0.0.0"),
            ("PORT", "3000"),
            ("TOKEN_TTL_HOURS", "1"),
            ("ENABLE_DIRECT_ORDERS", "true"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
        assert_eq!(config.token_ttl_hours, 1);
        assert!(config.direct_orders_enabled);
        assert!(config.is_production());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("DATABASE_URL", "postgres://user:hunter2@db/shop"),
        ]))
        .unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains(SECRET));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_production_requires_database() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();

        assert!(connect_store(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_memory_store_without_database() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", SECRET)])).unwrap();
        let store = connect_store(&config).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
    }
}
