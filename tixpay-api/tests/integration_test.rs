use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use tixpay_api::{app, AppState};
use tixpay_core::gateway::{Gateway, GatewayAdapter};
use tixpay_core::ledger::LedgerStore;
use tixpay_gateway::{CheckoutService, MockGatewayAdapter};
use tixpay_store::InMemoryLedger;

fn test_app() -> (axum::Router, Arc<InMemoryLedger>) {
    let ledger = Arc::new(InMemoryLedger::new());
    let adapters: Vec<Arc<dyn GatewayAdapter>> = vec![
        Arc::new(MockGatewayAdapter::new(Gateway::Stripe)),
        Arc::new(MockGatewayAdapter::new(Gateway::Paytabs)),
        Arc::new(MockGatewayAdapter::new(Gateway::Tap)),
    ];
    let checkout = CheckoutService::new(adapters, ledger.clone() as Arc<dyn LedgerStore>);
    let state = AppState::new(ledger.clone() as Arc<dyn LedgerStore>, checkout);
    (app(state), ledger)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_stripe_checkout_creates_pending_order() {
    let (app, ledger) = test_app();

    let response = app
        .oneshot(post_json(
            "/create-stripe-session",
            json!({"ticketType": "vip", "qty": 2}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let session_id = body["id"].as_str().unwrap();
    assert!(session_id.starts_with("cs_test_"));

    let orders = ledger.load().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, session_id);
    assert_eq!(orders[0].status, "PENDING");
    assert_eq!(orders[0].amount, 2000);
}

#[tokio::test]
async fn test_invalid_ticket_type_is_a_400_and_writes_nothing() {
    let (app, ledger) = test_app();

    let response = app
        .oneshot(post_json(
            "/create-stripe-session",
            json!({"ticketType": "platinum"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid ticket type");
    assert!(ledger.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_ticket_type_gets_the_error_envelope() {
    let (app, ledger) = test_app();

    let response = app
        .oneshot(post_json("/create-stripe-session", json!({"qty": 2})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid ticket type");
    assert!(ledger.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_overflowing_qty_is_a_400_and_writes_nothing() {
    let (app, ledger) = test_app();

    let response = app
        .oneshot(post_json(
            "/create-stripe-session",
            json!({"ticketType": "vip", "qty": 4611686018427387903i64}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid quantity");
    assert!(ledger.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_paytabs_checkout_returns_redirect_url() {
    let (app, _ledger) = test_app();

    let response = app
        .oneshot(post_json(
            "/create-paytabs-session",
            json!({"ticketType": "regular+", "name": "Omar", "phone": "+97150"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["redirect_url"].as_str().unwrap().contains("/pay/PT-"));
}

#[tokio::test]
async fn test_gateway_outage_maps_to_generic_500() {
    let ledger = Arc::new(InMemoryLedger::new());
    let adapters: Vec<Arc<dyn GatewayAdapter>> =
        vec![Arc::new(MockGatewayAdapter::failing(Gateway::Stripe))];
    let checkout = CheckoutService::new(adapters, ledger.clone() as Arc<dyn LedgerStore>);
    let app = app(AppState::new(ledger as Arc<dyn LedgerStore>, checkout));

    let response = app
        .oneshot(post_json(
            "/create-stripe-session",
            json!({"ticketType": "vip"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    // generic message only, no vendor detail
    assert_eq!(body["error"], "Stripe session failed");
}

#[tokio::test]
async fn test_stripe_create_then_reconcile_to_paid() {
    let (app, ledger) = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/create-stripe-session",
            json!({"ticketType": "vip", "qty": 2}),
        ))
        .await
        .unwrap();
    let session_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(post_json(
            "/stripe-callback",
            json!({"id": session_id, "status": "paid"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ok"], true);

    let orders = ledger.load().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, "paid");
    assert_eq!(orders[0].amount, 2000);
}

#[tokio::test]
async fn test_paytabs_callback_for_unknown_order_creates_one() {
    let (app, ledger) = test_app();

    let response = app
        .oneshot(post_json(
            "/paytabs-callback",
            json!({"cart_id": "PT-314159", "response_status": "A", "tran_ref": "TST314"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ok"], true);

    let orders = ledger.load().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, "PT-314159");
    assert_eq!(orders[0].status, "A");
    assert_eq!(orders[0].gateway_txn.as_deref(), Some("TST314"));
}

#[tokio::test]
async fn test_tap_callback_matches_on_metadata_ref() {
    let (app, ledger) = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/create-tap-session",
            json!({"ticketType": "vvip"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let order_id = ledger.load().await.unwrap()[0].id.clone();

    let response = app
        .oneshot(post_json(
            "/tap-callback",
            json!({"id": "chg_88", "status": "CAPTURED", "metadata": {"ref": order_id}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let orders = ledger.load().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, "CAPTURED");
    assert_eq!(orders[0].gateway_txn.as_deref(), Some("chg_88"));
    assert!(orders[0].link.is_some());
}

#[tokio::test]
async fn test_admin_orders_returns_full_ledger() {
    let (app, _ledger) = test_app();

    app.clone()
        .oneshot(post_json(
            "/create-paytabs-session",
            json!({"ticketType": "vip", "qty": 3}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/admin/orders")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["gateway"], "paytabs");
    assert_eq!(orders[0]["amount"], 3000);
    assert_eq!(orders[0]["ticketType"], "vip");
}

#[tokio::test]
async fn test_admin_csv_export() {
    let (app, _ledger) = test_app();

    app.clone()
        .oneshot(post_json(
            "/create-stripe-session",
            json!({"ticketType": "vip", "name": "Dana \"DD\" Haddad"}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/admin/orders.csv")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));

    let text = body_text(response).await;
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        r#""id","gateway","status","name","phone","ticketType","qty","amount","link","gateway_txn","created_at""#
    );
    let row = lines.next().unwrap();
    assert!(row.contains(r#""Dana ""DD"" Haddad""#));
    assert!(row.contains(r#""stripe","PENDING""#));
}
