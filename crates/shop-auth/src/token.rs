//! # Session Tokens
//!
//! HS256 JWTs binding a user id with a fixed lifetime.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shop_core::{ShopError, ShopResult, UserId};

/// Default token lifetime in hours
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Minimum signing secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer. Secrets shorter than [`MIN_SECRET_LEN`] are rejected.
    pub fn new(secret: &str, ttl: Duration) -> ShopResult<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(ShopError::Configuration(format!(
                "JWT_SECRET must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        if ttl <= Duration::zero() {
            return Err(ShopError::Configuration(
                "token lifetime must be positive".to_string(),
            ));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id`
    pub fn issue(&self, user_id: UserId) -> ShopResult<String> {
        let now = Utc::now();
        let claims = Claims {
            id: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ShopError::Internal(format!("token signing failed: {}", e)))
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> ShopResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| ShopError::Validation(format!("invalid token: {}", e)))
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-0123456789";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, Duration::hours(DEFAULT_TTL_HOURS)).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let user_id = UserId::new();
        let token = issuer().issue(user_id).unwrap();
        let claims = issuer().verify(&token).unwrap();

        assert_eq!(claims.id, user_id.to_string());
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issuer().issue(UserId::new()).unwrap();
        let other = TokenIssuer::new("another-secret-that-is-long-enough-xyz", Duration::hours(1))
            .unwrap();

        assert!(matches!(other.verify(&token), Err(ShopError::Validation(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let past = Claims {
            id: UserId::new().to_string(),
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::default(),
            &past,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(issuer().verify(&token).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = TokenIssuer::new("SUPER_SECRET", Duration::hours(24)).unwrap_err();
        assert!(matches!(err, ShopError::Configuration(_)));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        assert!(TokenIssuer::new(SECRET, Duration::zero()).is_err());
    }
}
