use std::net::SocketAddr;
use std::sync::Arc;

use tixpay_api::{app, AppState};
use tixpay_core::gateway::GatewayAdapter;
use tixpay_core::ledger::LedgerStore;
use tixpay_gateway::{CheckoutService, PayTabsAdapter, StripeAdapter, TapAdapter, GATEWAY_TIMEOUT};
use tixpay_store::JsonFileLedger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tixpay_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = tixpay_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting tixpay API on port {}", config.server.port);

    let ledger: Arc<dyn LedgerStore> = Arc::new(JsonFileLedger::new(&config.ledger.path));

    let client = reqwest::Client::builder()
        .timeout(GATEWAY_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client");

    let base_url = config.server.base_url.clone();
    let adapters: Vec<Arc<dyn GatewayAdapter>> = vec![
        Arc::new(StripeAdapter::new(
            config.gateways.stripe.secret_key.clone(),
            config.gateways.stripe.api_url.clone(),
            base_url.clone(),
            client.clone(),
        )),
        Arc::new(PayTabsAdapter::new(
            config.gateways.paytabs.profile_id.clone(),
            config.gateways.paytabs.server_key.clone(),
            config.gateways.paytabs.api_url.clone(),
            base_url.clone(),
            client.clone(),
        )),
        Arc::new(TapAdapter::new(
            config.gateways.tap.secret_key.clone(),
            config.gateways.tap.api_url.clone(),
            base_url,
            client,
        )),
    ];

    let checkout = CheckoutService::new(adapters, ledger.clone());
    let app = app(AppState::new(ledger, checkout));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
