//! Asynchronous gateway callbacks.
//!
//! Callbacks are acknowledged with `{ok: true}` in every case except a
//! true persistence failure, which returns 500 so the vendor retries.
//! Anything cosmetic (missing fields, odd status values) is tolerated by
//! the reconciler rather than bounced, to avoid vendor retry storms.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;
use tixpay_core::gateway::Gateway;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CallbackAck {
    pub ok: bool,
}

/// POST /stripe-callback
pub async fn stripe_callback(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<CallbackAck>, StatusCode> {
    handle(&state, Gateway::Stripe, payload).await
}

/// POST /paytabs-callback
pub async fn paytabs_callback(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<CallbackAck>, StatusCode> {
    handle(&state, Gateway::Paytabs, payload).await
}

/// POST /tap-callback
pub async fn tap_callback(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<CallbackAck>, StatusCode> {
    handle(&state, Gateway::Tap, payload).await
}

async fn handle(
    state: &AppState,
    gateway: Gateway,
    payload: Value,
) -> Result<Json<CallbackAck>, StatusCode> {
    match state.reconciler.reconcile(gateway, &payload).await {
        Ok(_) => Ok(Json(CallbackAck { ok: true })),
        Err(err) => {
            tracing::error!(gateway = %gateway, "callback persistence failed: {}", err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
