use async_trait::async_trait;
use tokio::sync::RwLock;

use tixpay_core::gateway::Gateway;
use tixpay_core::ledger::{LedgerError, LedgerStore};
use tixpay_core::order::{Order, OrderPatch};

/// In-memory ledger with the same semantics as [`crate::JsonFileLedger`].
/// Used by tests and available for embedding.
#[derive(Default)]
pub struct InMemoryLedger {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn load(&self) -> Result<Vec<Order>, LedgerError> {
        Ok(self.orders.read().await.clone())
    }

    async fn append(&self, order: Order) -> Result<(), LedgerError> {
        self.orders.write().await.push(order);
        Ok(())
    }

    async fn upsert(&self, id: &str, gateway: Gateway, patch: OrderPatch) -> Result<(), LedgerError> {
        let mut orders = self.orders.write().await;
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => patch.apply(order),
            None => orders.push(Order::from_patch(id.to_string(), gateway, &patch)),
        }
        Ok(())
    }
}
