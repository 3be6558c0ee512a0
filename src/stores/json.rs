//! The JSON format transactions are stored in.

use serde_json::Value;

use crate::{Error, transaction::Transaction};

/// Serialize `transactions` as a JSON array.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if serialization fails.
pub fn encode_transactions(transactions: &[Transaction]) -> Result<String, Error> {
    Ok(serde_json::to_string(transactions)?)
}

/// Parse a JSON array of stored transactions.
///
/// `null` is read as an empty list. Records without an ID, with a negative
/// amount or with an unreadable date are skipped with a warning, the rest are
/// kept in order.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if `json` is not an array.
pub fn decode_transactions(json: &str) -> Result<Vec<Transaction>, Error> {
    let records: Option<Vec<Value>> = serde_json::from_str(json)?;

    let transactions = records
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Transaction>(record) {
            Ok(transaction) if !transaction.has_valid_id() => {
                tracing::warn!("Skipping stored transaction {index}: missing ID");
                None
            }
            Ok(transaction) if transaction.amount < 0.0 => {
                tracing::warn!(
                    "Skipping stored transaction {}: negative amount {}",
                    transaction.id,
                    transaction.amount
                );
                None
            }
            Ok(transaction) => Some(transaction),
            Err(error) => {
                tracing::warn!("Skipping stored transaction {index}: {error}");
                None
            }
        })
        .collect();

    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error,
        category::Category,
        transaction::{Transaction, TransactionId},
    };

    use super::{decode_transactions, encode_transactions};

    #[test]
    fn decodes_what_was_encoded() {
        let transactions = vec![Transaction {
            id: TransactionId::new_unchecked("1"),
            amount: 4.2,
            category: Category::Health,
            description: Some("Vitamins".to_owned()),
            occurred_at: datetime!(2025-04-27 10:30 +12),
        }];

        let json = encode_transactions(&transactions).unwrap();
        let got = decode_transactions(&json).unwrap();

        assert_eq!(got, transactions);
    }

    #[test]
    fn skips_invalid_records() {
        let at = "2025-04-27T10:30:00Z";
        let json = json!([
            {"id": "good", "amount": 5, "category": "Food", "occurredAt": at},
            {"amount": 5, "category": "Food", "occurredAt": at},
            {"id": "", "amount": 5, "category": "Food", "occurredAt": at},
            {"id": "bad-date", "amount": 5, "category": "Food", "occurredAt": "last tuesday"},
            {"id": "refund", "amount": -50, "category": "Food", "occurredAt": at},
            {"id": "refund-text", "amount": "-20", "category": "Food", "occurredAt": at},
            {
                "id": "also-good",
                "amount": "oops",
                "category": "Food",
                "date": "2025-04-28T10:30:00.000Z"
            }
        ]);

        let got = decode_transactions(&json.to_string()).unwrap();

        let ids: Vec<&str> = got.iter().map(|t| t.id.as_ref()).collect();
        assert_eq!(ids, ["good", "also-good"]);
        assert_eq!(got[1].amount, 0.0);
    }

    #[test]
    fn loaded_amounts_are_never_negative() {
        let at = "2025-04-27T10:30:00Z";
        let json = json!([
            {"id": "a", "amount": -50, "category": "Food", "occurredAt": at},
            {"id": "b", "amount": "-20", "category": "Bills", "occurredAt": at},
            {"id": "c", "amount": 30, "category": "Food", "occurredAt": at}
        ]);

        let got = decode_transactions(&json.to_string()).unwrap();

        let amounts: Vec<f64> = got.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, [30.0]);
    }

    #[test]
    fn null_is_an_empty_list() {
        assert_eq!(decode_transactions("null"), Ok(Vec::new()));
    }

    #[test]
    fn rejects_non_array() {
        let got = decode_transactions("{\"id\": 1}");

        assert!(
            matches!(got, Err(Error::JSONSerializationError(_))),
            "want JSONSerializationError, got {got:?}"
        );
    }
}
