//! Tap charges with a hosted payment link.
//!
//! Like PayTabs, Tap's own charge id only arrives with the callback, so
//! the adapter mints a `TAP-` reference and plants it in the charge
//! metadata (`metadata.ref`), which the callback echoes back. Tap is the
//! one gateway whose hosted link is persisted on the order.

use serde::{Deserialize, Serialize};
use tixpay_core::gateway::{Gateway, GatewayAdapter, GatewayError, GatewaySession, SessionRequest};

use crate::GATEWAY_TIMEOUT;

pub struct TapAdapter {
    secret_key: String,
    api_url: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChargeRequest<'a> {
    amount: i64,
    currency: &'static str,
    description: &'a str,
    metadata: ChargeMetadata,
    customer: ChargeCustomer,
    redirect: ChargeUrl,
    post: ChargeUrl,
}

#[derive(Debug, Serialize)]
struct ChargeMetadata {
    #[serde(rename = "ref")]
    reference: String,
}

#[derive(Debug, Serialize)]
struct ChargeCustomer {
    first_name: String,
}

#[derive(Debug, Serialize)]
struct ChargeUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChargeResponse {
    transaction: ChargeTransaction,
}

#[derive(Debug, Deserialize)]
struct ChargeTransaction {
    url: String,
}

impl TapAdapter {
    pub fn new(secret_key: String, api_url: String, base_url: String, client: reqwest::Client) -> Self {
        Self {
            secret_key,
            api_url,
            base_url,
            client,
        }
    }

    fn unavailable(&self, detail: impl ToString) -> GatewayError {
        GatewayError::Unavailable {
            gateway: Gateway::Tap,
            detail: detail.to_string(),
        }
    }
}

fn charge_request<'a>(reference: String, request: &'a SessionRequest, base_url: &str) -> ChargeRequest<'a> {
    ChargeRequest {
        amount: request.amount,
        currency: "AED",
        description: &request.description,
        metadata: ChargeMetadata { reference },
        customer: ChargeCustomer {
            first_name: request.name.clone().unwrap_or_else(|| "Guest".to_string()),
        },
        redirect: ChargeUrl {
            url: format!("{}/success.html", base_url),
        },
        post: ChargeUrl {
            url: format!("{}/tap-callback", base_url),
        },
    }
}

#[async_trait::async_trait]
impl GatewayAdapter for TapAdapter {
    fn gateway(&self) -> Gateway {
        Gateway::Tap
    }

    async fn create_session(&self, request: &SessionRequest) -> Result<GatewaySession, GatewayError> {
        let reference = Gateway::Tap.synthesize_id();
        let body = charge_request(reference.clone(), request, &self.base_url);

        let response = self
            .client
            .post(format!("{}/charges", self.api_url))
            .bearer_auth(&self.secret_key)
            .json(&body)
            .timeout(GATEWAY_TIMEOUT)
            .send()
            .await
            .map_err(|err| self.unavailable(err))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.unavailable(format!("status {}: {}", status, body)));
        }

        let charge: ChargeResponse = response.json().await.map_err(|_| GatewayError::MalformedResponse {
            gateway: Gateway::Tap,
            field: "transaction.url",
        })?;

        Ok(GatewaySession {
            order_id: reference,
            session_id: None,
            redirect_url: Some(charge.transaction.url.clone()),
            link: Some(charge.transaction.url),
        })
    }
}
