use std::sync::Arc;

use tixpay_core::ledger::LedgerStore;
use tixpay_gateway::{CheckoutService, Reconciler};

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerStore>,
    pub checkout: Arc<CheckoutService>,
    pub reconciler: Arc<Reconciler>,
}

impl AppState {
    pub fn new(ledger: Arc<dyn LedgerStore>, checkout: CheckoutService) -> Self {
        Self {
            reconciler: Arc::new(Reconciler::new(ledger.clone())),
            checkout: Arc::new(checkout),
            ledger,
        }
    }
}
