//! # Password Hashing
//!
//! bcrypt hashing and verification. Both are deliberately slow, so they run
//! on the blocking thread pool instead of stalling the request executor.

use shop_core::{ShopError, ShopResult};

/// Default bcrypt cost factor (2^10 rounds)
pub const DEFAULT_COST: u32 = 10;

/// bcrypt password hasher with a fixed cost
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher. `cost` must be within bcrypt's 4..=31 range.
    pub fn new(cost: u32) -> ShopResult<Self> {
        if !(4..=31).contains(&cost) {
            return Err(ShopError::Configuration(format!(
                "bcrypt cost must be between 4 and 31, got {}",
                cost
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Derive a salted hash of `password`
    pub async fn hash(&self, password: &str) -> ShopResult<String> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| ShopError::Internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| ShopError::Internal(format!("password hashing failed: {}", e)))
    }

    /// Check `password` against a stored hash
    pub async fn verify(&self, password: &str, hash: &str) -> ShopResult<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| ShopError::Internal(format!("verify task failed: {}", e)))?
            .map_err(|e| ShopError::Internal(format!("password verification failed: {}", e)))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}
