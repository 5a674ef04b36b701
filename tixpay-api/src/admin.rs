//! Admin read endpoints: the whole ledger as JSON or CSV.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use tixpay_core::order::Order;

use crate::error::AppError;
use crate::state::AppState;

const CSV_COLUMNS: [&str; 11] = [
    "id",
    "gateway",
    "status",
    "name",
    "phone",
    "ticketType",
    "qty",
    "amount",
    "link",
    "gateway_txn",
    "created_at",
];

/// GET /admin/orders
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.ledger.load().await.map_err(|e| AppError::Anyhow(e.into()))?;
    Ok(Json(orders))
}

/// GET /admin/orders.csv
pub async fn export_orders_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let orders = state.ledger.load().await.map_err(|e| AppError::Anyhow(e.into()))?;
    let body = to_csv(&orders)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body))
}

/// Fixed column order, every field quoted, embedded quotes doubled
/// (the csv crate's escaping with QuoteStyle::Always).
fn to_csv(orders: &[Order]) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(CSV_COLUMNS)?;
    for order in orders {
        writer.write_record([
            order.id.clone(),
            order.gateway.to_string(),
            order.status.clone(),
            order.name.clone(),
            order.phone.clone(),
            order.ticket_type.map(|t| t.to_string()).unwrap_or_default(),
            order.qty.to_string(),
            order.amount.to_string(),
            order.link.clone().unwrap_or_default(),
            order.gateway_txn.clone().unwrap_or_default(),
            order.created_at.to_rfc3339(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("csv flush failed: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}
