//! # Shop Error Types
//!
//! Typed error handling for the shopfront backend.
//! Every domain, storage and provider operation returns `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for all shop operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Password did not match the stored hash
    #[error("Invalid Password")]
    InvalidCredentials,

    /// Missing or malformed request field
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unique constraint violated (duplicate email on create)
    #[error("Already exists: {0}")]
    Conflict(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Persistence layer failure (unreachable, query failed)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Returns true if a collaborator (store or payment provider) failed
    pub fn is_dependency_failure(&self) -> bool {
        matches!(
            self,
            ShopError::ProviderError { .. } | ShopError::NetworkError(_) | ShopError::Storage(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::InvalidCredentials => 400,
            ShopError::Validation(_) => 400,
            ShopError::Conflict(_) => 409,
            ShopError::Configuration(_) => 500,
            ShopError::ProviderError { .. } => 500,
            ShopError::NetworkError(_) => 500,
            ShopError::Storage(_) => 500,
            ShopError::Serialization(_) => 500,
            ShopError::Internal(_) => 500,
        }
    }

    /// Shorthand for a validation failure on a named field
    pub fn missing(field: &str) -> Self {
        ShopError::Validation(format!("{} is required", field))
    }
}

/// Result type alias for shop operations
pub type ShopResult<T> = Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_failures() {
        assert!(ShopError::Storage("connection refused".into()).is_dependency_failure());
        assert!(ShopError::ProviderError {
            provider: "stripe".into(),
            message: "card declined".into()
        }
        .is_dependency_failure());
        assert!(!ShopError::InvalidCredentials.is_dependency_failure());
        assert!(!ShopError::missing("email").is_dependency_failure());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ShopError::InvalidCredentials.status_code(), 400);
        assert_eq!(ShopError::missing("name").status_code(), 400);
        assert_eq!(ShopError::Conflict("a@x.com".into()).status_code(), 409);
        assert_eq!(ShopError::Storage("down".into()).status_code(), 500);
    }

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(ShopError::InvalidCredentials.to_string(), "Invalid Password");
        assert_eq!(
            ShopError::missing("email").to_string(),
            "Validation failed: email is required"
        );
    }
}
