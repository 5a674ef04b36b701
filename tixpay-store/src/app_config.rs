use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ledger: LedgerConfig,
    pub gateways: GatewaysConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Public base URL used to build return/callback URLs handed to the
    /// gateways
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Path of the JSON array file backing the order ledger
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewaysConfig {
    pub stripe: StripeConfig,
    pub paytabs: PayTabsConfig,
    pub tap: TapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    #[serde(default = "default_stripe_api_url")]
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PayTabsConfig {
    pub profile_id: String,
    pub server_key: String,
    #[serde(default = "default_paytabs_api_url")]
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TapConfig {
    pub secret_key: String,
    #[serde(default = "default_tap_api_url")]
    pub api_url: String,
}

fn default_stripe_api_url() -> String {
    "https://api.stripe.com/v1".to_string()
}

fn default_paytabs_api_url() -> String {
    "https://secure.paytabs.com".to_string()
}

fn default_tap_api_url() -> String {
    "https://api.tap.company/v2".to_string()
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `TIXPAY__GATEWAYS__STRIPE__SECRET_KEY=sk_...`
            .add_source(config::Environment::with_prefix("TIXPAY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
