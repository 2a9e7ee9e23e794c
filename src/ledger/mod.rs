//! Uptime ledger: the persisted record, its transition logic, and storage.

mod engine;
mod models;
mod store;

pub use engine::*;
pub use models::*;
pub use store::*;
