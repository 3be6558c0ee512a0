//! Defines the transaction store trait.

use crate::{Error, transaction::Transaction};

/// Loads and saves the complete list of transactions.
///
/// Stores always read and write the whole list. Reads and writes are
/// asynchronous so that slow backends do not block the caller.
#[allow(async_fn_in_trait)]
pub trait TransactionStore {
    /// Retrieve every stored transaction.
    ///
    /// A store that has never been written to returns an empty list. Records
    /// that cannot be read are skipped.
    async fn load_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Replace the stored transactions with `transactions`.
    async fn save_all(&self, transactions: &[Transaction]) -> Result<(), Error>;
}
