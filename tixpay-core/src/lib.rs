pub mod callback;
pub mod gateway;
pub mod ledger;
pub mod order;
pub mod ticket;

pub use gateway::{Gateway, GatewayAdapter, GatewayError, GatewaySession, SessionRequest};
pub use ledger::{LedgerError, LedgerStore};
pub use order::{Order, OrderPatch, StatusKind};
pub use ticket::TicketType;
