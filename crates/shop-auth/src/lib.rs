//! # shop-auth
//!
//! Storefront authentication: bcrypt password hashing, HS256 session
//! tokens and the combined login/register flow.
//!
//! ```rust,ignore
//! use shop_auth::{AuthService, PasswordHasher, TokenIssuer};
//!
//! let auth = AuthService::new(store, PasswordHasher::default(), TokenIssuer::new(&secret, ttl)?);
//! let outcome = auth.login("a@x.com", "pw1").await?;
//! // outcome.token goes back to the client
//! ```

pub mod password;
pub mod service;
pub mod token;

pub use password::{PasswordHasher, DEFAULT_COST};
pub use service::{AuthOutcome, AuthService};
pub use token::{Claims, TokenIssuer, DEFAULT_TTL_HOURS, MIN_SECRET_LEN};
