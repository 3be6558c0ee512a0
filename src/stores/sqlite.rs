//! Implements a SQLite backed transaction store.
use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, OptionalExtension};

use crate::{
    Error,
    stores::{
        TransactionStore,
        json::{decode_transactions, encode_transactions},
    },
    transaction::Transaction,
};

/// The key the transaction list is stored under.
pub const STORAGE_KEY: &str = "finance_ai_app_expenses";

/// Stores the transaction list as a JSON document in a SQLite key-value table.
#[derive(Debug, Clone)]
pub struct SQLiteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// This function will create the key-value table if it does not exist.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the table could not be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        create_key_value_table(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Open, or create, the database file at `path`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the file cannot be opened as a SQLite
    /// database.
    pub fn open(path: &Path) -> Result<Self, Error> {
        Self::new(Connection::open(path)?)
    }

    /// Create a store backed by a temporary in-memory database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the database could not be created.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Delete every stored transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    pub fn clear(&self) -> Result<(), Error> {
        let connection = self.lock()?;

        connection.execute("DELETE FROM key_value WHERE key = ?1", [STORAGE_KEY])?;

        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl TransactionStore for SQLiteStore {
    /// Read the transaction list stored under [STORAGE_KEY].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the database lock is poisoned,
    /// - [Error::SqlError] if there is an SQL error,
    /// - or [Error::JSONSerializationError] if the stored value is not a JSON array.
    async fn load_all(&self) -> Result<Vec<Transaction>, Error> {
        let json: Option<String> = {
            let connection = self.lock()?;

            connection
                .query_row(
                    "SELECT value FROM key_value WHERE key = ?1",
                    [STORAGE_KEY],
                    |row| row.get(0),
                )
                .optional()?
        };

        match json {
            Some(json) => decode_transactions(&json),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the transaction list stored under [STORAGE_KEY].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::JSONSerializationError] if the transactions cannot be serialized,
    /// - [Error::DatabaseLockError] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    async fn save_all(&self, transactions: &[Transaction]) -> Result<(), Error> {
        let json = encode_transactions(transactions)?;
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO key_value (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (STORAGE_KEY, json),
        )?;

        Ok(())
    }
}

/// Create the key-value table if it does not already exist.
pub fn create_key_value_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        category::Category,
        stores::TransactionStore,
        transaction::{Transaction, TransactionId},
    };

    use super::{STORAGE_KEY, SQLiteStore};

    fn test_transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                id: TransactionId::new_unchecked("1"),
                amount: 12.0,
                category: Category::Food,
                description: Some("Groceries".to_owned()),
                occurred_at: datetime!(2025-04-27 10:30 UTC),
            },
            Transaction {
                id: TransactionId::new_unchecked("2"),
                amount: 3.5,
                category: Category::Transport,
                description: None,
                occurred_at: datetime!(2025-04-26 08:00 UTC),
            },
        ]
    }

    #[tokio::test]
    async fn empty_database_has_no_transactions() {
        let store = SQLiteStore::open_in_memory().unwrap();

        let got = store.load_all().await.unwrap();

        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn loads_saved_transactions() {
        let store = SQLiteStore::open_in_memory().unwrap();
        let want = test_transactions();

        store.save_all(&want).await.unwrap();
        let got = store.load_all().await.unwrap();

        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn save_overwrites_previous_list() {
        let store = SQLiteStore::open_in_memory().unwrap();
        let transactions = test_transactions();

        store.save_all(&transactions).await.unwrap();
        store.save_all(&transactions[1..]).await.unwrap();
        let got = store.load_all().await.unwrap();

        assert_eq!(got, transactions[1..]);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = SQLiteStore::open_in_memory().unwrap();
        store.save_all(&test_transactions()).await.unwrap();

        store.clear().unwrap();
        let got = store.load_all().await.unwrap();

        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn corrupt_value_is_a_serialization_error() {
        let connection = Connection::open_in_memory().unwrap();
        super::create_key_value_table(&connection).unwrap();
        connection
            .execute(
                "INSERT INTO key_value (key, value) VALUES (?1, ?2)",
                (STORAGE_KEY, "not json"),
            )
            .unwrap();
        let store = SQLiteStore::new(connection).unwrap();

        let got = store.load_all().await;

        assert!(
            matches!(got, Err(Error::JSONSerializationError(_))),
            "want JSONSerializationError, got {got:?}"
        );
    }
}
