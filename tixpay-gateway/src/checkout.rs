use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tixpay_core::gateway::{Gateway, GatewayAdapter, GatewayError, SessionRequest};
use tixpay_core::ledger::{LedgerError, LedgerStore};
use tixpay_core::order::Order;
use tixpay_core::ticket::TicketType;

/// Checkout-creation body shared by all three gateway endpoints.
/// `ticket_type` stays a raw optional string so an unknown or absent
/// value maps to a 400 with the usual error envelope instead of a
/// deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(rename = "ticketType")]
    pub ticket_type: Option<String>,
    pub qty: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// What the HTTP layer hands back to the client: Stripe callers use
/// `session_id`, PayTabs/Tap callers use `redirect_url`.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub session_id: Option<String>,
    pub redirect_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Invalid ticket type: {0}")]
    InvalidTicketType(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("{0} adapter not configured")]
    AdapterNotConfigured(Gateway),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Orchestrates checkout-session creation: validates the ticket type,
/// computes the amount once, asks the gateway adapter for a session, and
/// records the PENDING order.
pub struct CheckoutService {
    adapters: HashMap<Gateway, Arc<dyn GatewayAdapter>>,
    ledger: Arc<dyn LedgerStore>,
}

impl CheckoutService {
    pub fn new(adapters: Vec<Arc<dyn GatewayAdapter>>, ledger: Arc<dyn LedgerStore>) -> Self {
        let adapters = adapters.into_iter().map(|a| (a.gateway(), a)).collect();
        Self { adapters, ledger }
    }

    pub async fn create_session(
        &self,
        gateway: Gateway,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let adapter = self
            .adapters
            .get(&gateway)
            .ok_or(CheckoutError::AdapterNotConfigured(gateway))?;

        let raw_ticket = request.ticket_type.clone().unwrap_or_default();
        let ticket_type = raw_ticket
            .parse::<TicketType>()
            .map_err(|_| CheckoutError::InvalidTicketType(raw_ticket))?;
        let qty = request.qty.unwrap_or(1).max(1);
        let amount = ticket_type
            .unit_price()
            .checked_mul(qty)
            .ok_or(CheckoutError::InvalidQuantity(qty))?;

        let session_request = SessionRequest {
            ticket_type,
            qty,
            amount,
            description: ticket_type.description(),
            name: request.name.clone(),
            phone: request.phone.clone(),
        };

        let session = adapter.create_session(&session_request).await?;

        let mut order = Order::pending(
            session.order_id.clone(),
            gateway,
            ticket_type,
            qty,
            request.name,
            request.phone,
        );
        order.link = session.link.clone();

        self.ledger.append(order.clone()).await?;
        tracing::info!(
            order_id = %order.id,
            gateway = %gateway,
            amount = order.amount,
            "checkout session created"
        );

        Ok(CheckoutOutcome {
            order,
            session_id: session.session_id,
            redirect_url: session.redirect_url,
        })
    }
}

/// Stand-in adapter for tests and local runs without vendor credentials.
/// Mints ids in each gateway's scheme and never leaves the process.
pub struct MockGatewayAdapter {
    gateway: Gateway,
    fail: bool,
}

impl MockGatewayAdapter {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway, fail: false }
    }

    /// Every create_session call reports the gateway as unavailable
    pub fn failing(gateway: Gateway) -> Self {
        Self { gateway, fail: true }
    }
}

#[async_trait::async_trait]
impl GatewayAdapter for MockGatewayAdapter {
    fn gateway(&self) -> Gateway {
        self.gateway
    }

    async fn create_session(
        &self,
        _request: &SessionRequest,
    ) -> Result<tixpay_core::gateway::GatewaySession, GatewayError> {
        if self.fail {
            return Err(GatewayError::Unavailable {
                gateway: self.gateway,
                detail: "simulated gateway outage".to_string(),
            });
        }

        let session = match self.gateway {
            Gateway::Stripe => {
                let id = format!("cs_test_{}", Gateway::Stripe.synthesize_id());
                tixpay_core::gateway::GatewaySession {
                    order_id: id.clone(),
                    session_id: Some(id),
                    redirect_url: None,
                    link: None,
                }
            }
            Gateway::Paytabs => {
                let id = Gateway::Paytabs.synthesize_id();
                tixpay_core::gateway::GatewaySession {
                    redirect_url: Some(format!("https://paytabs.mock/pay/{}", id)),
                    order_id: id,
                    session_id: None,
                    link: None,
                }
            }
            Gateway::Tap => {
                let id = Gateway::Tap.synthesize_id();
                let url = format!("https://tap.mock/pay/{}", id);
                tixpay_core::gateway::GatewaySession {
                    order_id: id,
                    session_id: None,
                    redirect_url: Some(url.clone()),
                    link: Some(url),
                }
            }
        };
        Ok(session)
    }
}
