//! Contains the trait and implementations for objects that store transactions.

mod json;
mod memory;
mod sqlite;
mod transaction;

pub use json::{decode_transactions, encode_transactions};
pub use memory::MemoryStore;
pub use sqlite::{SQLiteStore, STORAGE_KEY};
pub use transaction::TransactionStore;
