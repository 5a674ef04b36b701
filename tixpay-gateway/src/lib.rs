pub mod checkout;
pub mod paytabs;
pub mod reconcile;
pub mod stripe;
pub mod tap;

pub use checkout::{CheckoutError, CheckoutOutcome, CheckoutRequest, CheckoutService, MockGatewayAdapter};
pub use paytabs::PayTabsAdapter;
pub use reconcile::Reconciler;
pub use stripe::StripeAdapter;
pub use tap::TapAdapter;

use std::time::Duration;

/// Hard cap on every outbound gateway call so a slow vendor cannot pin
/// request handlers.
pub const GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);
