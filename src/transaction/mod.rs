//! Transactions and the operations that shape the transaction list.
//!
//! This module contains:
//! - The `Transaction` model, `TransactionBuilder` and `TransactionPatch`
//! - Date-range presets and their resolution to concrete intervals
//! - The filter pipeline and sort engine used by the transaction list

mod core;
mod query;
mod range;
mod sort;

pub use core::{
    Transaction, TransactionBuilder, TransactionId, TransactionPatch, lenient_amount,
    normalise_description, parse_amount, parse_occurred_at,
};
pub use query::{TransactionFilter, filter_transactions};
pub use range::{DatePreset, DateRange, ResolvedRange, range_label, resolve_date_range};
pub use sort::{SortKey, sort_transactions};

pub(crate) use range::{month_start, next_month_start, year_start};
