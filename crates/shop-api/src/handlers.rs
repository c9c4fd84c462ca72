//! # Request Handlers
//!
//! Axum request handlers for the shopfront API.
//! Each handler converts every failure into its endpoint's JSON error shape.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use shop_core::{Cart, CartItem, Inquiry, InquiryForm, Order, PaymentStrategy, ShopError, Store};
use tracing::{error, info, instrument, warn};

/// Body returned for any checkout failure the client cannot fix
const CHECKOUT_FAILED: &str = "Could not create payment session";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub email: String,
}

/// Checkout (and direct order) request
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Items to purchase; each becomes one line item
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Customer email
    #[serde(default)]
    pub email: Option<String>,
}

/// Create checkout response
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Hosted checkout URL (redirect user here)
    pub url: String,
}

/// Success body for create endpoints
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub message: String,
}

impl CreatedResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Failure body for auth, inquiry and order endpoints
#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FailureResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Failure body for the checkout endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type Failure<T> = (StatusCode, Json<T>);

fn status_of(err: &ShopError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// `{success:false, message}` for bad passwords, `{success:false, error}` otherwise
fn shop_error_to_failure(err: ShopError) -> Failure<FailureResponse> {
    let status = status_of(&err);
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    match err {
        ShopError::InvalidCredentials => (status, Json(FailureResponse::message(err.to_string()))),
        other => (status, Json(FailureResponse::error(other.to_string()))),
    }
}

/// Client errors keep their detail; dependency failures get a generic body
fn shop_error_to_checkout_failure(err: ShopError) -> Failure<ErrorResponse> {
    let status = status_of(&err);
    let message = if status.is_server_error() {
        CHECKOUT_FAILED.to_string()
    } else {
        err.to_string()
    };
    (status, Json(ErrorResponse { error: message }))
}

fn rejection_to_error(rejection: JsonRejection) -> ShopError {
    ShopError::Validation(rejection.body_text())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "shopfront",
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.store.backend_name(),
    }))
}

/// Combined login/register
///
/// POST /api/auth/login
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, Failure<FailureResponse>> {
    let Json(request) = payload
        .map_err(rejection_to_error)
        .map_err(shop_error_to_failure)?;

    let email = request
        .email
        .ok_or_else(|| shop_error_to_failure(ShopError::missing("email")))?;
    let password = request
        .password
        .ok_or_else(|| shop_error_to_failure(ShopError::missing("password")))?;

    let outcome = state
        .auth
        .login(&email, &password)
        .await
        .map_err(shop_error_to_failure)?;

    info!(
        user_id = %outcome.user.id,
        registered = outcome.registered,
        "Login succeeded"
    );

    Ok(Json(LoginResponse {
        success: true,
        token: outcome.token,
        email: outcome.user.email,
    }))
}

/// Create a hosted checkout session, then record the pending order
///
/// POST /api/create-checkout-session
#[instrument(skip(state, payload))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, Failure<ErrorResponse>> {
    let Json(request) = payload
        .map_err(rejection_to_error)
        .map_err(shop_error_to_checkout_failure)?;

    let email = request.email.unwrap_or_default();
    let cart = Cart::from_items(request.items, &email, state.currency)
        .map_err(shop_error_to_checkout_failure)?;

    let success_url = state.success_url();
    let cancel_url = state.cancel_url();

    info!(
        "Creating checkout: cart={}, {} items, total={}, provider={}",
        cart.id,
        cart.item_count(),
        cart.total().display(),
        state.payments.provider_name()
    );

    let session = state
        .payments
        .create_checkout(&cart, &success_url, &cancel_url)
        .await
        .map_err(|e| {
            error!("Failed to create checkout: {}", e);
            shop_error_to_checkout_failure(e)
        })?;

    let order = Order::for_session(&cart, &session);
    state.store.insert_order(&order).await.map_err(|e| {
        error!(
            session_id = %session.session_id,
            "Failed to save order, checkout session is orphaned: {}", e
        );
        shop_error_to_checkout_failure(e)
    })?;

    info!(
        order_id = %order.id,
        session_id = %session.session_id,
        expires_at = ?session.expires_at,
        "Created pending order {}", order.total
    );

    Ok(Json(CheckoutResponse {
        url: session.checkout_url,
    }))
}

/// Store a contact inquiry
///
/// POST /api/inquiry
#[instrument(skip(state, payload))]
pub async fn create_inquiry(
    State(state): State<AppState>,
    payload: Result<Json<InquiryForm>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), Failure<FailureResponse>> {
    let Json(form) = payload
        .map_err(rejection_to_error)
        .map_err(shop_error_to_failure)?;

    let inquiry = Inquiry::from_form(form).map_err(|e| {
        warn!("Rejected inquiry: {}", e);
        shop_error_to_failure(e)
    })?;

    state
        .store
        .insert_inquiry(&inquiry)
        .await
        .map_err(shop_error_to_failure)?;

    info!(inquiry_id = %inquiry.id, "Inquiry stored");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new("Inquiry stored successfully!")),
    ))
}

/// Save an order with no payment step
///
/// POST /api/orders (only mounted when direct orders are enabled)
#[instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), Failure<FailureResponse>> {
    let Json(request) = payload
        .map_err(rejection_to_error)
        .map_err(shop_error_to_failure)?;

    let email = request.email.unwrap_or_default();
    let cart = Cart::from_items(request.items, &email, state.currency)
        .map_err(shop_error_to_failure)?;

    let order = Order::direct(&cart);
    state
        .store
        .insert_order(&order)
        .await
        .map_err(shop_error_to_failure)?;

    info!(order_id = %order.id, "Direct order saved {}", order.total);

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new("Order saved successfully!")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_shape() {
        let (status, Json(body)) = shop_error_to_failure(ShopError::InvalidCredentials);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.message.as_deref(), Some("Invalid Password"));
        assert!(body.error.is_none());
    }

    #[test]
    fn test_storage_failure_shape() {
        let (status, Json(body)) =
            shop_error_to_failure(ShopError::Storage("connection refused".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Storage error: connection refused"));
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let (status, _) = shop_error_to_failure(ShopError::Conflict("user a@x.com".into()));
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_checkout_failure_hides_dependency_detail() {
        let (status, Json(body)) = shop_error_to_checkout_failure(ShopError::ProviderError {
            provider: "stripe".into(),
            message: "sk_live key revoked".into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, CHECKOUT_FAILED);

        let (status, Json(body)) =
            shop_error_to_checkout_failure(ShopError::Validation("Order has no items".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Validation failed: Order has no items");
    }
}
