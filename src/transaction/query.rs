//! Filters a transaction list down to what the user asked to see.

use crate::category::CategoryFilter;

use super::{core::Transaction, range::ResolvedRange};

/// The predicates applied to the transaction list, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionFilter<'a> {
    /// Only transactions that happened within this interval are kept.
    pub date_range: ResolvedRange,
    /// Only transactions in a matching category are kept.
    pub category: CategoryFilter,
    /// Only transactions whose description or category name contain this text
    /// are kept, ignoring case. Empty text keeps everything.
    pub search: &'a str,
}

/// Get the transactions that pass `filter`, keeping their original order.
///
/// The date range is applied first, then the category and then the search
/// text.
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: &TransactionFilter,
) -> Vec<Transaction> {
    let search = filter.search.trim().to_lowercase();

    transactions
        .iter()
        .filter(|transaction| filter.date_range.contains(transaction.occurred_at))
        .filter(|transaction| filter.category.matches(transaction.category))
        .filter(|transaction| search.is_empty() || matches_search(transaction, &search))
        .cloned()
        .collect()
}

/// `search` must already be lowercase.
fn matches_search(transaction: &Transaction, search: &str) -> bool {
    let in_description = transaction
        .description
        .as_deref()
        .is_some_and(|description| description.to_lowercase().contains(search));

    in_description || transaction.category.name().to_lowercase().contains(search)
}
