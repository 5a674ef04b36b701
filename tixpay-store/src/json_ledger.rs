use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use tixpay_core::gateway::Gateway;
use tixpay_core::ledger::{LedgerError, LedgerStore};
use tixpay_core::order::{Order, OrderPatch};

/// Order ledger backed by a single pretty-printed JSON array file.
///
/// Every write re-reads and rewrites the whole collection, so cost is
/// O(n) per write; fine at this service's volume, wrong for anything
/// bigger. Writes go through one async mutex and land via temp-file +
/// rename, so concurrent requests cannot lose updates and readers never
/// observe a partial file.
pub struct JsonFileLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Missing, empty, or unparseable files all read as an empty ledger.
    /// Corruption is logged, never surfaced.
    async fn read_all(&self) -> Vec<Order> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!("ledger read failed, treating as empty: {}", err);
                return Vec::new();
            }
        };
        if bytes.is_empty() {
            return Vec::new();
        }
        match serde_json::from_slice(&bytes) {
            Ok(orders) => orders,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "ledger file corrupt, treating as empty: {}", err);
                Vec::new()
            }
        }
    }

    async fn persist(&self, orders: &[Order]) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(orders)?;
        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl LedgerStore for JsonFileLedger {
    async fn load(&self) -> Result<Vec<Order>, LedgerError> {
        Ok(self.read_all().await)
    }

    async fn append(&self, order: Order) -> Result<(), LedgerError> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_all().await;
        orders.push(order);
        self.persist(&orders).await
    }

    async fn upsert(&self, id: &str, gateway: Gateway, patch: OrderPatch) -> Result<(), LedgerError> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_all().await;
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => patch.apply(order),
            None => orders.push(Order::from_patch(id.to_string(), gateway, &patch)),
        }
        self.persist(&orders).await
    }
}
