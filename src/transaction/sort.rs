//! Orders the transaction list.

use std::{cmp::Ordering, fmt::Display};

use super::core::Transaction;

/// The field used to order transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recent first.
    #[default]
    Date,
    /// Largest first.
    Amount,
    /// Alphabetical by category name.
    Category,
    /// Alphabetical by description, or category name when there is none.
    Name,
}

impl SortKey {
    /// Every sort key in display order.
    pub const ALL: [SortKey; 4] = [
        SortKey::Date,
        SortKey::Amount,
        SortKey::Category,
        SortKey::Name,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Date => "Date",
            SortKey::Amount => "Amount",
            SortKey::Category => "Category",
            SortKey::Name => "Name",
        }
    }

    /// Parse a sort key from its label, ignoring case.
    ///
    /// Anything unrecognized falls back to [SortKey::Date].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();

        Self::ALL
            .into_iter()
            .find(|key| key.label().eq_ignore_ascii_case(label))
            .unwrap_or_default()
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sort `transactions` in place by `key`.
///
/// The sort is stable: transactions that compare equal keep their relative
/// order.
pub fn sort_transactions(transactions: &mut [Transaction], key: SortKey) {
    match key {
        SortKey::Date => transactions.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at)),
        SortKey::Amount => transactions
            .sort_by(|a, b| sortable_amount(b.amount).total_cmp(&sortable_amount(a.amount))),
        SortKey::Category => transactions
            .sort_by(|a, b| compare_ignoring_case(a.category.name(), b.category.name())),
        SortKey::Name => {
            transactions.sort_by(|a, b| compare_ignoring_case(a.display_name(), b.display_name()))
        }
    }
}

fn sortable_amount(amount: f64) -> f64 {
    if amount.is_finite() { amount } else { 0.0 }
}

fn compare_ignoring_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
