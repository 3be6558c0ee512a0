//! An in-memory transaction store with switchable failures.

use std::sync::{Mutex, MutexGuard};

use crate::{
    Error,
    stores::{
        TransactionStore,
        json::{decode_transactions, encode_transactions},
    },
    transaction::Transaction,
};

#[derive(Debug, Default)]
struct MemoryState {
    json: Option<String>,
    failing_saves: usize,
    failing_loads: bool,
    save_count: usize,
}

/// Keeps the serialized transaction list in memory.
///
/// The list goes through the same JSON encoding as the persistent store.
/// Loads and saves can be made to fail with [Error::StorageUnavailable] to
/// simulate an unreachable backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `json`.
    pub fn with_json(json: &str) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                json: Some(json.to_owned()),
                ..Default::default()
            }),
        }
    }

    /// Make the next `count` calls to [TransactionStore::save_all] fail.
    pub fn fail_next_saves(&self, count: usize) -> Result<(), Error> {
        self.lock()?.failing_saves = count;
        Ok(())
    }

    /// Make every call to [TransactionStore::load_all] fail, or succeed again.
    pub fn fail_loads(&self, fail: bool) -> Result<(), Error> {
        self.lock()?.failing_loads = fail;
        Ok(())
    }

    /// The JSON held by the store, if anything has been saved.
    pub fn json(&self) -> Result<Option<String>, Error> {
        Ok(self.lock()?.json.clone())
    }

    /// The number of save attempts, including failed ones.
    pub fn save_count(&self) -> Result<usize, Error> {
        Ok(self.lock()?.save_count)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, Error> {
        self.state.lock().map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<Transaction>, Error> {
        let state = self.lock()?;

        if state.failing_loads {
            return Err(Error::StorageUnavailable("load failed".to_owned()));
        }

        match &state.json {
            Some(json) => decode_transactions(json),
            None => Ok(Vec::new()),
        }
    }

    async fn save_all(&self, transactions: &[Transaction]) -> Result<(), Error> {
        let mut state = self.lock()?;
        state.save_count += 1;

        if state.failing_saves > 0 {
            state.failing_saves -= 1;
            return Err(Error::StorageUnavailable("save failed".to_owned()));
        }

        state.json = Some(encode_transactions(transactions)?);

        Ok(())
    }
}
