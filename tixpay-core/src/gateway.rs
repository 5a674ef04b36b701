use crate::ticket::TicketType;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Disambiguates ids minted within the same millisecond
static SYNTH_SEQ: AtomicU64 = AtomicU64::new(0);

/// External payment processors this service can create sessions against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gateway {
    Stripe,
    Paytabs,
    Tap,
}

impl Gateway {
    /// Prefix used when this service has to mint its own order reference.
    /// Stripe supplies a session id, so it never synthesizes one at
    /// checkout time; the prefix still exists for malformed callbacks.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Gateway::Stripe => "ST",
            Gateway::Paytabs => "PT",
            Gateway::Tap => "TAP",
        }
    }

    /// Mint a local order reference: `PREFIX-` + millisecond timestamp +
    /// a process-local sequence, so two checkouts landing in the same
    /// millisecond never share a ledger id.
    pub fn synthesize_id(&self) -> String {
        let seq = SYNTH_SEQ.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}-{}", self.id_prefix(), Utc::now().timestamp_millis(), seq)
    }
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gateway::Stripe => "stripe",
            Gateway::Paytabs => "paytabs",
            Gateway::Tap => "tap",
        };
        write!(f, "{}", s)
    }
}

/// Validated input handed to an adapter: ticket type already checked
/// against the price table, amount already computed.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub ticket_type: TicketType,
    pub qty: i64,
    /// Whole AED, `unit_price * qty`
    pub amount: i64,
    pub description: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// What an adapter hands back after the gateway accepted the session.
/// Exactly one of `session_id` / `redirect_url` is set, depending on the
/// gateway's checkout style.
#[derive(Debug, Clone)]
pub struct GatewaySession {
    /// Locally meaningful order id: Stripe's session id, or a synthesized
    /// `PT-`/`TAP-` reference for gateways that only reveal their real
    /// reference at callback time.
    pub order_id: String,
    pub session_id: Option<String>,
    pub redirect_url: Option<String>,
    /// Hosted payment link worth persisting on the order (Tap)
    pub link: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Transport failure or non-success vendor response. The detail is
    /// for logs only; clients get a generic message.
    #[error("{gateway} gateway unavailable: {detail}")]
    Unavailable { gateway: Gateway, detail: String },

    /// The vendor answered 2xx but the expected field was missing
    #[error("{gateway} response missing {field}")]
    MalformedResponse { gateway: Gateway, field: &'static str },
}

impl GatewayError {
    pub fn gateway(&self) -> Gateway {
        match self {
            GatewayError::Unavailable { gateway, .. } => *gateway,
            GatewayError::MalformedResponse { gateway, .. } => *gateway,
        }
    }
}

/// One implementation per payment gateway. Adapters translate a generic
/// session request into the vendor's create call and derive the order id
/// the ledger will track.
#[async_trait]
pub trait GatewayAdapter: Send + Sync {
    fn gateway(&self) -> Gateway;

    async fn create_session(&self, request: &SessionRequest) -> Result<GatewaySession, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_id_shape() {
        let id = Gateway::Paytabs.synthesize_id();
        assert!(id.starts_with("PT-"));
        assert!(id["PT-".len()..].chars().all(|c| c.is_ascii_digit() || c == '-'));

        let id = Gateway::Tap.synthesize_id();
        assert!(id.starts_with("TAP-"));
    }

    #[test]
    fn test_synthesized_ids_are_unique_within_a_millisecond() {
        let ids: Vec<String> = (0..64).map(|_| Gateway::Paytabs.synthesize_id()).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_gateway_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Gateway::Paytabs).unwrap(), "\"paytabs\"");
        let g: Gateway = serde_json::from_str("\"tap\"").unwrap();
        assert_eq!(g, Gateway::Tap);
    }
}
