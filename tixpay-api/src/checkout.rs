use axum::{extract::State, Json};
use serde::Serialize;
use tixpay_core::gateway::Gateway;
use tixpay_gateway::CheckoutRequest;

use crate::error::AppError;
use crate::state::AppState;

/// Stripe callers receive the session id and drive the redirect with
/// Stripe.js
#[derive(Debug, Serialize)]
pub struct StripeSessionResponse {
    pub id: String,
}

/// PayTabs and Tap callers receive a hosted page to redirect to
#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub redirect_url: String,
}

/// POST /create-stripe-session
pub async fn create_stripe_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<StripeSessionResponse>, AppError> {
    let outcome = state.checkout.create_session(Gateway::Stripe, request).await?;
    let id = outcome
        .session_id
        .ok_or(AppError::GatewayFailure(Gateway::Stripe))?;
    Ok(Json(StripeSessionResponse { id }))
}

/// POST /create-paytabs-session
pub async fn create_paytabs_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<RedirectResponse>, AppError> {
    let outcome = state.checkout.create_session(Gateway::Paytabs, request).await?;
    let redirect_url = outcome
        .redirect_url
        .ok_or(AppError::GatewayFailure(Gateway::Paytabs))?;
    Ok(Json(RedirectResponse { redirect_url }))
}

/// POST /create-tap-session
pub async fn create_tap_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<RedirectResponse>, AppError> {
    let outcome = state.checkout.create_session(Gateway::Tap, request).await?;
    let redirect_url = outcome
        .redirect_url
        .ok_or(AppError::GatewayFailure(Gateway::Tap))?;
    Ok(Json(RedirectResponse { redirect_url }))
}
