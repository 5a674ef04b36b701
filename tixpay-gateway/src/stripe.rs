//! Stripe hosted checkout sessions.
//!
//! Stripe is the one gateway that hands back its own session id up front,
//! so that id becomes the order id directly. The front end receives the
//! session id and drives the redirect itself.

use serde::Deserialize;
use tixpay_core::gateway::{Gateway, GatewayAdapter, GatewayError, GatewaySession, SessionRequest};

use crate::GATEWAY_TIMEOUT;

pub struct StripeAdapter {
    secret_key: String,
    api_url: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
}

impl StripeAdapter {
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
            gateway: Gateway::Stripe,
            detail: detail.to_string(),
        }
    }
}

/// Form-encoded body for POST /v1/checkout/sessions: one line item,
/// amount in fils (AED x 100).
fn session_params(request: &SessionRequest, base_url: &str) -> Vec<(&'static str, String)> {
    vec![
        ("payment_method_types[0]", "card".to_string()),
        ("mode", "payment".to_string()),
        ("line_items[0][price_data][currency]", "aed".to_string()),
        (
            "line_items[0][price_data][product_data][name]",
            request.description.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]",
            (request.ticket_type.unit_price() * 100).to_string(),
        ),
        ("line_items[0][quantity]", request.qty.to_string()),
        (
            "success_url",
            format!("{}/success.html?session_id={{CHECKOUT_SESSION_ID}}", base_url),
        ),
        ("cancel_url", format!("{}/cancel.html", base_url)),
    ]
}

#[async_trait::async_trait]
impl GatewayAdapter for StripeAdapter {
    fn gateway(&self) -> Gateway {
        Gateway::Stripe
    }

    async fn create_session(&self, request: &SessionRequest) -> Result<GatewaySession, GatewayError> {
        let params = session_params(request, &self.base_url);

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.api_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .timeout(GATEWAY_TIMEOUT)
            .send()
            .await
            .map_err(|err| self.unavailable(err))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.unavailable(format!("status {}: {}", status, body)));
        }

        let session: StripeSession = response.json().await.map_err(|_| GatewayError::MalformedResponse {
            gateway: Gateway::Stripe,
            field: "id",
        })?;

        Ok(GatewaySession {
            order_id: session.id.clone(),
            session_id: Some(session.id),
            redirect_url: None,
            link: None,
        })
    }
}
