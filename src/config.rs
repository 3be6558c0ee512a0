//! Settings for opening the transaction store and the initial view.

use std::path::PathBuf;

use crate::{
    Error,
    analytics::AnalyticsPeriod,
    category::CategoryFilter,
    clock::SystemClock,
    coordinator::{Coordinator, ViewState},
    stores::SQLiteStore,
    transaction::{DatePreset, DateRange, SortKey},
};

/// The timezone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// The currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// The database file used when none is configured.
pub const DEFAULT_DB_PATH: &str = "spendlens.db";

/// Application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// File path to the SQLite database.
    pub db_path: PathBuf,
    /// The canonical IANA name of the user's timezone, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The symbol printed before amounts. Amounts are never converted.
    pub currency_symbol: String,
    /// The date range the transaction list starts with.
    pub date_range: DateRange,
    /// The order the transaction list starts with.
    pub sort_key: SortKey,
    /// The period the analytics view starts with.
    pub analytics_period: AnalyticsPeriod,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            local_timezone: DEFAULT_TIMEZONE.to_owned(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_owned(),
            date_range: DateRange::Preset(DatePreset::default()),
            sort_key: SortKey::default(),
            analytics_period: AnalyticsPeriod::default(),
        }
    }
}

impl Config {
    /// Create a clock for the configured timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone is unknown.
    pub fn clock(&self) -> Result<SystemClock, Error> {
        SystemClock::new(&self.local_timezone)
    }

    /// The view state described by this config, with no category filter or
    /// search text.
    pub fn view_state(&self) -> ViewState {
        ViewState {
            category_filter: CategoryFilter::All,
            search_text: String::new(),
            date_range: self.date_range,
            sort_key: self.sort_key,
        }
    }

    /// Open the database and load the transactions into a coordinator.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidTimezoneError] if the timezone is unknown,
    /// - or [Error::SqlError] if the database cannot be opened.
    pub async fn open_coordinator(&self) -> Result<Coordinator<SQLiteStore, SystemClock>, Error> {
        let clock = self.clock()?;
        let store = SQLiteStore::open(&self.db_path)?;

        tracing::info!("Opened database at {}", self.db_path.display());

        Ok(Coordinator::load_with(store, clock, self.view_state(), self.analytics_period).await)
    }
}
