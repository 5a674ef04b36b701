use crate::gateway::Gateway;
use crate::ticket::TicketType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status an order starts in at checkout-session creation
pub const PENDING: &str = "PENDING";

/// Coarse classification of a vendor status string.
///
/// The raw vendor string is always kept verbatim on the order; this enum
/// exists so downstream logic does not have to pattern-match three
/// gateways' vocabularies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Pending,
    Paid,
    Failed,
    Unknown,
}

impl StatusKind {
    pub fn classify(status: &str) -> Self {
        let s = status.trim().to_ascii_lowercase();
        match s.as_str() {
            "pending" | "initiated" => return StatusKind::Pending,
            // PayTabs response_status single-letter codes
            "a" => return StatusKind::Paid,
            "d" | "e" => return StatusKind::Failed,
            _ => {}
        }
        if ["paid", "success", "captured", "completed"].iter().any(|k| s.contains(k)) {
            StatusKind::Paid
        } else if ["fail", "decline", "cancel", "error", "abandoned"].iter().any(|k| s.contains(k)) {
            StatusKind::Failed
        } else {
            StatusKind::Unknown
        }
    }
}

/// The single persisted entity: one row per checkout attempt.
///
/// `id` is the Stripe session id or a synthesized `PT-`/`TAP-` reference;
/// `status` holds whatever string the gateway last reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub gateway: Gateway,
    pub status: String,
    pub name: String,
    pub phone: String,
    /// Absent on orders fabricated from a callback for an unknown id
    #[serde(rename = "ticketType", skip_serializing_if = "Option::is_none", default)]
    pub ticket_type: Option<TicketType>,
    pub qty: i64,
    /// Whole AED, fixed at creation, never recomputed
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gateway_txn: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// A fresh PENDING order as written by a gateway adapter at
    /// checkout-session creation.
    pub fn pending(
        id: String,
        gateway: Gateway,
        ticket_type: TicketType,
        qty: i64,
        name: Option<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            id,
            gateway,
            status: PENDING.to_string(),
            name: name.unwrap_or_else(|| "Guest".to_string()),
            phone: phone.unwrap_or_default(),
            ticket_type: Some(ticket_type),
            qty,
            // callers validate qty; saturate rather than panic on junk input
            amount: ticket_type.unit_price().saturating_mul(qty),
            link: None,
            gateway_txn: None,
            created_at: Utc::now(),
        }
    }

    /// An order fabricated by the reconciler when a callback references an
    /// id the ledger has never seen. Carries no ticket information.
    pub fn from_patch(id: String, gateway: Gateway, patch: &OrderPatch) -> Self {
        Self {
            id,
            gateway,
            status: patch.status.clone().unwrap_or_else(|| PENDING.to_string()),
            name: "Guest".to_string(),
            phone: String::new(),
            ticket_type: None,
            qty: 1,
            amount: 0,
            link: patch.link.clone(),
            gateway_txn: patch.gateway_txn.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn status_kind(&self) -> StatusKind {
        StatusKind::classify(&self.status)
    }
}

/// Partial update applied by `LedgerStore::upsert`. Set fields win over
/// the stored value; unset fields leave the order untouched.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub status: Option<String>,
    pub gateway_txn: Option<String>,
    pub link: Option<String>,
}

impl OrderPatch {
    pub fn apply(&self, order: &mut Order) {
        if let Some(status) = &self.status {
            order.status = status.clone();
        }
        if let Some(txn) = &self.gateway_txn {
            order.gateway_txn = Some(txn.clone());
        }
        if let Some(link) = &self.link {
            order.link = Some(link.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_order_amount() {
        let order = Order::pending(
            "cs_test_1".into(),
            Gateway::Stripe,
            TicketType::Vip,
            2,
            None,
            None,
        );
        assert_eq!(order.amount, 2000);
        assert_eq!(order.status, PENDING);
        assert_eq!(order.name, "Guest");
        assert_eq!(order.phone, "");
        assert_eq!(order.status_kind(), StatusKind::Pending);
    }

    #[test]
    fn test_patch_merges_without_discarding() {
        let mut order = Order::pending(
            "PT-1".into(),
            Gateway::Paytabs,
            TicketType::RegularPlus,
            1,
            Some("Amal".into()),
            Some("+9715000000".into()),
        );
        let patch = OrderPatch {
            status: Some("A".into()),
            gateway_txn: Some("TST2211".into()),
            link: None,
        };
        patch.apply(&mut order);
        assert_eq!(order.status, "A");
        assert_eq!(order.gateway_txn.as_deref(), Some("TST2211"));
        assert_eq!(order.name, "Amal");
        assert_eq!(order.amount, 500);
    }

    #[test]
    fn test_absurd_qty_saturates_instead_of_panicking() {
        let order = Order::pending(
            "cs_big".into(),
            Gateway::Stripe,
            TicketType::Vip,
            i64::MAX / 2,
            None,
            None,
        );
        assert_eq!(order.amount, i64::MAX);
    }

    #[test]
    fn test_fabricated_order_defaults() {
        let patch = OrderPatch {
            status: Some("paid".into()),
            ..Default::default()
        };
        let order = Order::from_patch("PT-99".into(), Gateway::Paytabs, &patch);
        assert_eq!(order.status, "paid");
        assert_eq!(order.ticket_type, None);
        assert_eq!(order.amount, 0);
        assert_eq!(order.qty, 1);
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(StatusKind::classify("PENDING"), StatusKind::Pending);
        assert_eq!(StatusKind::classify("paid"), StatusKind::Paid);
        assert_eq!(StatusKind::classify("A"), StatusKind::Paid);
        assert_eq!(StatusKind::classify("CAPTURED"), StatusKind::Paid);
        assert_eq!(StatusKind::classify("D"), StatusKind::Failed);
        assert_eq!(StatusKind::classify("payment_failed"), StatusKind::Failed);
        assert_eq!(StatusKind::classify("CANCELLED"), StatusKind::Failed);
        assert_eq!(StatusKind::classify("weird-vendor-string"), StatusKind::Unknown);
    }

    #[test]
    fn test_order_json_shape() {
        let order = Order::pending(
            "TAP-7".into(),
            Gateway::Tap,
            TicketType::Vvip,
            1,
            None,
            None,
        );
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["ticketType"], "vvip");
        assert_eq!(value["gateway"], "tap");
        assert_eq!(value["amount"], 10_000);
        // unset options stay out of the persisted shape
        assert!(value.get("link").is_none());
        assert!(value.get("gateway_txn").is_none());
    }
}
