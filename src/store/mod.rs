// src/store/mod.rs
pub mod identity;
pub mod ledger;
pub mod lines;

pub use identity::IdentityStore;
pub use ledger::{load_discovered, load_excluded, CategoryLedger};
