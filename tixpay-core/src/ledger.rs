use crate::order::{Order, OrderPatch};
use crate::gateway::Gateway;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable access to the order collection.
///
/// Implementations must preserve insertion order and serialize writes so
/// concurrent appends/upserts never lose an update. Reads fail soft: a
/// missing or corrupt backing store is an empty ledger, not an error.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// All orders, oldest first
    async fn load(&self) -> Result<Vec<Order>, LedgerError>;

    /// Add one order at the end and persist
    async fn append(&self, order: Order) -> Result<(), LedgerError>;

    /// Merge `patch` into the order with this id (patch wins per field);
    /// if no such order exists, append a fresh one fabricated from the
    /// patch with a new `created_at`.
    async fn upsert(&self, id: &str, gateway: Gateway, patch: OrderPatch) -> Result<(), LedgerError>;
}
