//! # Auth Service
//!
//! Combined login/register. A single `login` call keeps the storefront's
//! one-endpoint contract, but account creation and password checks are
//! separate operations with their own validation.

use crate::password::PasswordHasher;
use crate::token::TokenIssuer;
use shop_core::{BoxedStore, ShopError, ShopResult, User};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub token: String,
    /// True if this call created the account
    pub registered: bool,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: BoxedStore,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(store: BoxedStore, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens: Arc::new(tokens),
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Log in, creating the account if the email has never been seen.
    ///
    /// Never updates an existing user. A wrong password returns
    /// `ShopError::InvalidCredentials` and no token is issued.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ShopResult<AuthOutcome> {
        if email.trim().is_empty() {
            return Err(ShopError::missing("email"));
        }

        let (user, registered) = match self.store.find_user_by_email(email).await? {
            Some(user) => {
                self.authenticate(&user, password).await?;
                (user, false)
            }
            None => (self.register(email, password).await?, true),
        };

        let token = self.tokens.issue(user.id)?;

        Ok(AuthOutcome {
            user,
            token,
            registered,
        })
    }

    /// Create a new account with a hashed password.
    ///
    /// Returns `ShopError::Conflict` if another request registered the same
    /// email first.
    pub async fn register(&self, email: &str, password: &str) -> ShopResult<User> {
        let password_hash = self.hasher.hash(password).await?;
        let user = User::new(email, password_hash);

        self.store.insert_user(&user).await?;

        info!(user_id = %user.id, "Registered new user");
        Ok(user)
    }

    /// Check `password` against an existing account
    pub async fn authenticate(&self, user: &User, password: &str) -> ShopResult<()> {
        if self.hasher.verify(password, &user.password_hash).await? {
            Ok(())
        } else {
            warn!(user_id = %user.id, "Password mismatch");
            Err(ShopError::InvalidCredentials)
        }
    }
}
