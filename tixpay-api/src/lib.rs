use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod callbacks;
pub mod checkout;
pub mod error;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // The front end is served from elsewhere, so CORS stays permissive
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/create-stripe-session", post(checkout::create_stripe_session))
        .route("/create-paytabs-session", post(checkout::create_paytabs_session))
        .route("/create-tap-session", post(checkout::create_tap_session))
        .route("/stripe-callback", post(callbacks::stripe_callback))
        .route("/paytabs-callback", post(callbacks::paytabs_callback))
        .route("/tap-callback", post(callbacks::tap_callback))
        .route("/admin/orders", get(admin::list_orders))
        .route("/admin/orders.csv", get(admin::export_orders_csv))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
