//! PayTabs hosted payment pages.
//!
//! PayTabs does not reveal its transaction reference until the callback,
//! so the adapter mints a `PT-` cart id at session time and uses it as
//! the order id; the callback's `cart_id` ties the two together.

use serde::{Deserialize, Serialize};
use tixpay_core::gateway::{Gateway, GatewayAdapter, GatewayError, GatewaySession, SessionRequest};

use crate::GATEWAY_TIMEOUT;

pub struct PayTabsAdapter {
    profile_id: String,
    server_key: String,
    api_url: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct PaymentRequest<'a> {
    profile_id: &'a str,
    tran_type: &'static str,
    tran_class: &'static str,
    cart_id: &'a str,
    cart_description: &'a str,
    cart_currency: &'static str,
    cart_amount: i64,
    callback: String,
    #[serde(rename = "return")]
    return_url: String,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    redirect_url: String,
}

impl PayTabsAdapter {
    pub fn new(
        profile_id: String,
        server_key: String,
        api_url: String,
        base_url: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            profile_id,
            server_key,
            api_url,
            base_url,
            client,
        }
    }

    fn unavailable(&self, detail: impl ToString) -> GatewayError {
        GatewayError::Unavailable {
            gateway: Gateway::Paytabs,
            detail: detail.to_string(),
        }
    }
}

fn payment_request<'a>(
    profile_id: &'a str,
    cart_id: &'a str,
    request: &'a SessionRequest,
    base_url: &str,
) -> PaymentRequest<'a> {
    PaymentRequest {
        profile_id,
        tran_type: "sale",
        tran_class: "ecom",
        cart_id,
        cart_description: &request.description,
        cart_currency: "AED",
        cart_amount: request.amount,
        callback: format!("{}/paytabs-callback", base_url),
        return_url: format!("{}/success.html", base_url),
    }
}

#[async_trait::async_trait]
impl GatewayAdapter for PayTabsAdapter {
    fn gateway(&self) -> Gateway {
        Gateway::Paytabs
    }

    async fn create_session(&self, request: &SessionRequest) -> Result<GatewaySession, GatewayError> {
        let cart_id = Gateway::Paytabs.synthesize_id();
        let body = payment_request(&self.profile_id, &cart_id, request, &self.base_url);

        let response = self
            .client
            .post(format!("{}/payment/request", self.api_url))
            .header("authorization", &self.server_key)
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

        let payment: PaymentResponse = response.json().await.map_err(|_| GatewayError::MalformedResponse {
            gateway: Gateway::Paytabs,
            field: "redirect_url",
        })?;

        Ok(GatewaySession {
            order_id: cart_id,
            session_id: None,
            redirect_url: Some(payment.redirect_url),
            link: None,
        })
    }
}
