use std::sync::Arc;

use serde_json::Value;
use tixpay_core::gateway::Gateway;
use tixpay_core::ledger::{LedgerError, LedgerStore};
use tixpay_core::order::OrderPatch;

/// Matches an asynchronous gateway callback to a ledger entry and applies
/// the reported status and transaction reference.
///
/// Tolerant by design: a payload with no recognizable id gets a freshly
/// minted one, and an id the ledger has never seen fabricates a new
/// record (gateways sometimes call back before the initiation write
/// lands). The only failure that propagates is a persistence failure, so
/// the HTTP layer can return non-2xx and let the vendor retry.
pub struct Reconciler {
    ledger: Arc<dyn LedgerStore>,
}

impl Reconciler {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Returns the order id the callback was applied to.
    pub async fn reconcile(&self, gateway: Gateway, payload: &Value) -> Result<String, LedgerError> {
        let extracted = gateway.callback_mapping().extract(payload);

        let id = match extracted.id {
            Some(id) => id,
            None => {
                let id = gateway.synthesize_id();
                tracing::warn!(gateway = %gateway, order_id = %id, "callback carried no order id, minted one");
                id
            }
        };

        tracing::info!(
            gateway = %gateway,
            order_id = %id,
            status = extracted.status.as_deref().unwrap_or("<none>"),
            "reconciling callback"
        );

        let patch = OrderPatch {
            status: extracted.status,
            gateway_txn: extracted.txn,
            link: None,
        };
        self.ledger.upsert(&id, gateway, patch).await?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tixpay_core::order::{Order, StatusKind};
    use tixpay_core::ticket::TicketType;
    use tixpay_store::InMemoryLedger;

    fn reconciler() -> (Reconciler, Arc<InMemoryLedger>) {
        let ledger = Arc::new(InMemoryLedger::new());
        (Reconciler::new(ledger.clone() as Arc<dyn LedgerStore>), ledger)
    }

    #[tokio::test]
    async fn test_stripe_paid_scenario() {
        let (reconciler, ledger) = reconciler();
        ledger
            .append(Order::pending(
                "cs_test_42".into(),
                Gateway::Stripe,
                TicketType::Vip,
                2,
                None,
                None,
            ))
            .await
            .unwrap();

        let id = reconciler
            .reconcile(Gateway::Stripe, &json!({"id": "cs_test_42", "status": "paid"}))
            .await
            .unwrap();
        assert_eq!(id, "cs_test_42");

        let orders = ledger.load().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, "paid");
        assert_eq!(orders[0].status_kind(), StatusKind::Paid);
        assert_eq!(orders[0].amount, 2000);
    }

    #[tokio::test]
    async fn test_paytabs_unknown_id_fabricates_order() {
        let (reconciler, ledger) = reconciler();

        reconciler
            .reconcile(
                Gateway::Paytabs,
                &json!({"cart_id": "PT-9999", "response_status": "A", "tran_ref": "TST9"}),
            )
            .await
            .unwrap();

        let orders = ledger.load().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, "PT-9999");
        assert_eq!(orders[0].status, "A");
        assert_eq!(orders[0].gateway_txn.as_deref(), Some("TST9"));
        assert_eq!(orders[0].ticket_type, None);
    }

    #[tokio::test]
    async fn test_malformed_callback_mints_an_id() {
        let (reconciler, ledger) = reconciler();

        let id = reconciler
            .reconcile(Gateway::Tap, &json!({"unexpected": true}))
            .await
            .unwrap();
        assert!(id.starts_with("TAP-"));

        let orders = ledger.load().await.unwrap();
        assert_eq!(orders.len(), 1);
        // no status in the payload leaves the fabricated order PENDING
        assert_eq!(orders[0].status, "PENDING");
    }

    #[tokio::test]
    async fn test_missing_status_keeps_existing_status() {
        let (reconciler, ledger) = reconciler();
        ledger
            .append(Order::pending(
                "TAP-7".into(),
                Gateway::Tap,
                TicketType::RegularPlus,
                1,
                None,
                None,
            ))
            .await
            .unwrap();

        reconciler
            .reconcile(Gateway::Tap, &json!({"id": "chg_1", "metadata": {"ref": "TAP-7"}}))
            .await
            .unwrap();

        let orders = ledger.load().await.unwrap();
        assert_eq!(orders[0].status, "PENDING");
        assert_eq!(orders[0].gateway_txn.as_deref(), Some("chg_1"));
    }
}
