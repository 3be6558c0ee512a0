//! Deterministic sample transactions for manual testing and demos.

use time::{Duration, OffsetDateTime, Time};

use crate::{
    category::Category,
    transaction::{Transaction, TransactionId},
};

/// How many days of history the samples cover, ending today.
pub const SAMPLE_DAYS: i64 = 90;

const SAMPLE_ITEMS: [(Category, &str, f64); 16] = [
    (Category::Food, "Groceries", 64.20),
    (Category::Food, "Lunch", 14.50),
    (Category::Food, "Coffee", 4.80),
    (Category::Transport, "Bus fare", 3.60),
    (Category::Transport, "Fuel", 72.00),
    (Category::Shopping, "Clothes", 49.99),
    (Category::Shopping, "Household supplies", 23.40),
    (Category::Entertainment, "Cinema", 18.00),
    (Category::Entertainment, "Streaming subscription", 15.99),
    (Category::Bills, "Electricity", 120.35),
    (Category::Bills, "Phone", 45.00),
    (Category::Health, "Pharmacy", 27.80),
    (Category::Health, "Gym membership", 35.00),
    (Category::Education, "Books", 32.50),
    (Category::Education, "Online course", 89.00),
    (Category::Other, "Gift", 40.00),
];

/// Generate a spread of transactions over the last [SAMPLE_DAYS] days.
///
/// The output depends only on `now`, so the same `now` always gives the same
/// transactions. Nothing is dated after `now`.
pub fn sample_transactions(now: OffsetDateTime) -> Vec<Transaction> {
    let mut transactions = Vec::new();

    for days_ago in 0..SAMPLE_DAYS {
        let date = now.date() - Duration::days(days_ago);
        let count = (days_ago % 3 + 1) as usize;

        for index in 0..count {
            let seed = days_ago as usize * 7 + index * 5;
            let (category, description, base_amount) = SAMPLE_ITEMS[seed % SAMPLE_ITEMS.len()];
            // Vary amounts by up to +/-20%.
            let scale = 0.8 + (seed % 9) as f64 * 0.05;
            let amount = (base_amount * scale * 100.0).round() / 100.0;

            let hour = (8 + (seed % 13)) as u8;
            let minute = ((seed * 17) % 60) as u8;
            let occurred_at = Time::from_hms(hour, minute, 0)
                .map(|time| date.with_time(time).assume_offset(now.offset()))
                .unwrap_or(now);

            transactions.push(Transaction {
                id: TransactionId::new_unchecked(&format!("sample-{days_ago}-{index}")),
                amount,
                category,
                description: Some(description.to_owned()),
                occurred_at: occurred_at.min(now),
            });
        }
    }

    transactions
}
