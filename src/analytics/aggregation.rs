//! Per-category totals and summary figures for the analytics view.

use std::collections::HashMap;

use serde::Serialize;

use crate::{category::Category, transaction::Transaction};

/// The total spent in one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// A category's total and its share of all spending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: f64,
    /// Whole percent of the grand total, rounded to nearest.
    pub percent: i64,
}

/// Summary figures for a list of transactions.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Aggregates {
    /// The sum of every amount.
    pub total_amount: f64,
    /// One entry per category, in the order each category was first seen.
    pub category_totals: Vec<CategoryTotal>,
    /// The category with the largest total. Ties go to the category seen first.
    pub most_spent_category: Option<CategoryTotal>,
    /// The total divided by the number of days in the period.
    pub avg_daily_spending: f64,
}

impl Aggregates {
    /// Each category's share of the total, in the same order as
    /// [Aggregates::category_totals].
    pub fn category_shares(&self) -> Vec<CategoryShare> {
        category_shares(&self.category_totals, self.total_amount)
    }

    /// The `count` categories with the largest totals, largest first.
    ///
    /// Categories with equal totals keep the order they were first seen in.
    pub fn top_categories(&self, count: usize) -> Vec<CategoryTotal> {
        top_categories(&self.category_totals, count)
    }
}

pub(crate) fn category_shares(totals: &[CategoryTotal], total_amount: f64) -> Vec<CategoryShare> {
    totals
        .iter()
        .map(|entry| CategoryShare {
            category: entry.category,
            total: entry.total,
            percent: percent_of(entry.total, total_amount),
        })
        .collect()
}

pub(crate) fn top_categories(totals: &[CategoryTotal], count: usize) -> Vec<CategoryTotal> {
    let mut totals = totals.to_vec();
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals.truncate(count);
    totals
}

/// Sum `transactions` per category and overall.
///
/// `days` is the length of the period the transactions were taken from. It is
/// treated as at least one.
pub fn aggregate(transactions: &[Transaction], days: i64) -> Aggregates {
    let mut category_totals: Vec<CategoryTotal> = Vec::new();
    let mut positions: HashMap<Category, usize> = HashMap::new();
    let mut total_amount = 0.0;

    for transaction in transactions {
        total_amount += transaction.amount;

        let position = *positions.entry(transaction.category).or_insert_with(|| {
            category_totals.push(CategoryTotal {
                category: transaction.category,
                total: 0.0,
            });
            category_totals.len() - 1
        });
        category_totals[position].total += transaction.amount;
    }

    let mut most_spent_category: Option<CategoryTotal> = None;
    for entry in &category_totals {
        match most_spent_category {
            Some(current) if current.total >= entry.total => {}
            _ => most_spent_category = Some(*entry),
        }
    }

    Aggregates {
        total_amount,
        avg_daily_spending: total_amount / days.max(1) as f64,
        category_totals,
        most_spent_category,
    }
}

fn percent_of(value: f64, total: f64) -> i64 {
    if total == 0.0 {
        0
    } else {
        ((value / total) * 100.0).round() as i64
    }
}
