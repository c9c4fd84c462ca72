//! # Inquiry Types
//!
//! Contact-form submissions. Each submission is stored as its own
//! immutable record; identical submissions are not deduplicated.

use crate::error::{ShopError, ShopResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-assigned inquiry identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InquiryId(pub Uuid);

impl std::fmt::Display for InquiryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Contact form fields as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InquiryForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Service the visitor is asking about
    #[serde(default)]
    pub service: Option<String>,
}

/// A stored contact inquiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: InquiryId,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Inquiry {
    /// Validate a submitted form. Name, email and message are required.
    pub fn from_form(form: InquiryForm) -> ShopResult<Self> {
        let name = required(form.name, "name")?;
        let email = required(form.email, "email")?;
        let message = required(form.message, "message")?;
        let service = form
            .service
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            id: InquiryId(Uuid::new_v4()),
            name,
            email,
            message,
            service,
            created_at: Utc::now(),
        })
    }
}

fn required(value: Option<String>, field: &str) -> ShopResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ShopError::missing(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> InquiryForm {
        InquiryForm {
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            message: Some("Do you ship to Leeds?".into()),
            service: None,
        }
    }

    #[test]
    fn test_valid_inquiry() {
        let inquiry = Inquiry::from_form(form()).unwrap();
        assert_eq!(inquiry.name, "Ada");
        assert!(inquiry.service.is_none());
    }

    #[test]
    fn test_required_fields() {
        let mut missing_message = form();
        missing_message.message = None;
        let err = Inquiry::from_form(missing_message).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: message is required");

        let mut blank_name = form();
        blank_name.name = Some("   ".into());
        assert!(matches!(
            Inquiry::from_form(blank_name),
            Err(ShopError::Validation(_))
        ));
    }

    #[test]
    fn test_optional_service() {
        let mut with_service = form();
        with_service.service = Some(" Bespoke framing ".into());
        let inquiry = Inquiry::from_form(with_service).unwrap();
        assert_eq!(inquiry.service.as_deref(), Some("Bespoke framing"));
    }

    #[test]
    fn test_each_submission_gets_its_own_id() {
        let a = Inquiry::from_form(form()).unwrap();
        let b = Inquiry::from_form(form()).unwrap();
        assert_ne!(a.id, b.id);
    }
}
