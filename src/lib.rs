//! Spendlens is an engine for tracking personal expenses.
//!
//! It keeps a list of transactions and answers three questions about them:
//! which transactions match the current filters, in what order they should be
//! shown, and how spending adds up over time. The [Coordinator] owns the
//! transactions and the view state and recomputes both views after every
//! change. Storage and the clock are injected through the [TransactionStore]
//! and [Clock] traits.

mod analytics;
mod category;
mod clock;
mod config;
mod coordinator;
mod display;
mod logging;
mod sample_data;
mod stores;
mod timezone;
mod transaction;

pub use analytics::{
    Aggregates, AnalyticsPeriod, CategoryShare, CategoryTotal, TimeSeries, aggregate,
    bucket_transactions, resolve_period,
};
pub use category::{ALL_CATEGORIES_LABEL, Category, CategoryFilter};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, DEFAULT_CURRENCY_SYMBOL, DEFAULT_DB_PATH, DEFAULT_TIMEZONE};
pub use coordinator::{AnalyticsView, Coordinator, ViewState};
pub use display::{
    format_currency, format_currency_rounded, format_date, format_time, relative_time_label,
};
pub use logging::setup_logging;
pub use sample_data::{SAMPLE_DAYS, sample_transactions};
pub use stores::{
    MemoryStore, SQLiteStore, STORAGE_KEY, TransactionStore, decode_transactions,
    encode_transactions,
};
pub use transaction::{
    DatePreset, DateRange, ResolvedRange, SortKey, Transaction, TransactionBuilder,
    TransactionFilter, TransactionId, TransactionPatch, filter_transactions, lenient_amount,
    normalise_description, parse_amount, parse_occurred_at, range_label, resolve_date_range,
    sort_transactions,
};

/// The broad classes of [Error], used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input was rejected before any state changed.
    Validation,
    /// The referenced transaction does not exist.
    NotFound,
    /// Reading from or writing to storage failed.
    Persistence,
    /// The application was configured with invalid settings.
    Configuration,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount could not be parsed as a number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The amount was a number, but less than zero.
    ///
    /// Transactions record money that was spent, so amounts are never negative.
    #[error("{0} is negative, amounts must be zero or more")]
    NegativeAmount(f64),

    /// The date could not be parsed.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not parse the date \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// No transaction has the given ID.
    #[error("could not find a transaction with the ID {0}")]
    NotFound(TransactionId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The stored transactions could not be converted to or from JSON.
    #[error("could not serialize transactions as JSON: {0}")]
    JSONSerializationError(String),

    /// The storage backend could not be reached.
    #[error("storage is unavailable: {0}")]
    StorageUnavailable(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl Error {
    /// The broad class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidAmount(_) | Error::NegativeAmount(_) | Error::InvalidDateFormat(_, _) => {
                ErrorKind::Validation
            }
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::JSONSerializationError(_)
            | Error::StorageUnavailable(_) => ErrorKind::Persistence,
            Error::InvalidTimezoneError(_) => ErrorKind::Configuration,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}
