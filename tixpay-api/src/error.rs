use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tixpay_core::gateway::Gateway;
use tixpay_gateway::CheckoutError;

#[derive(Debug)]
pub enum AppError {
    InvalidTicketType,
    InvalidQuantity,
    /// Upstream gateway failed; clients get a generic per-gateway message
    GatewayFailure(Gateway),
    LedgerWriteFailure,
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidTicketType => {
                (StatusCode::BAD_REQUEST, "Invalid ticket type".to_string())
            }
            AppError::InvalidQuantity => {
                (StatusCode::BAD_REQUEST, "Invalid quantity".to_string())
            }
            AppError::GatewayFailure(gateway) => {
                (StatusCode::INTERNAL_SERVER_ERROR, session_failed_message(gateway))
            }
            AppError::LedgerWriteFailure => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Order could not be recorded".to_string(),
            ),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

fn session_failed_message(gateway: Gateway) -> String {
    match gateway {
        Gateway::Stripe => "Stripe session failed".to_string(),
        Gateway::Paytabs => "PayTabs session failed".to_string(),
        Gateway::Tap => "Tap session failed".to_string(),
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::InvalidTicketType(value) => {
                tracing::debug!("rejected checkout for unknown ticket type {:?}", value);
                AppError::InvalidTicketType
            }
            CheckoutError::InvalidQuantity(qty) => {
                tracing::debug!("rejected checkout for unusable quantity {}", qty);
                AppError::InvalidQuantity
            }
            CheckoutError::Gateway(gateway_err) => {
                // vendor detail stays in the logs
                tracing::error!("gateway call failed: {}", gateway_err);
                AppError::GatewayFailure(gateway_err.gateway())
            }
            CheckoutError::AdapterNotConfigured(gateway) => {
                tracing::error!("no adapter configured for {}", gateway);
                AppError::GatewayFailure(gateway)
            }
            CheckoutError::Ledger(ledger_err) => {
                tracing::error!("ledger write failed: {}", ledger_err);
                AppError::LedgerWriteFailure
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
