pub mod app_config;
pub mod json_ledger;
pub mod memory;

pub use json_ledger::JsonFileLedger;
pub use memory::InMemoryLedger;
