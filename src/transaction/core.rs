//! Defines the core data models for transactions and the functions that turn
//! user input into valid field values.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};
use uuid::Uuid;

use crate::{Error, category::Category};

// ============================================================================
// MODELS
// ============================================================================

/// The unique, immutable identifier of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a fresh, random ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create an ID from an existing string without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(id: &str) -> Self {
        Self(id.to_owned())
    }

    fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An expense, i.e. an event where money was spent.
///
/// To create a new `Transaction`, use [Transaction::build] and pass the
/// builder to [Coordinator::add](crate::Coordinator::add).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent, never negative.
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub amount: f64,
    /// What the money was spent on.
    #[serde(default)]
    pub category: Category,
    /// A text description of what the transaction was for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339", alias = "date")]
    pub occurred_at: OffsetDateTime,
}

impl Transaction {
    /// Start building a new transaction.
    ///
    /// `amount` and `category` are kept as the raw text the user entered, they
    /// are validated when the builder is added to the
    /// [Coordinator](crate::Coordinator).
    pub fn build(amount: &str, category: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount: amount.to_owned(),
            category: category.to_owned(),
            description: None,
            occurred_at: None,
        }
    }

    /// The description if there is one, otherwise the category name.
    pub fn display_name(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => description,
            _ => self.category.name(),
        }
    }

    pub(crate) fn has_valid_id(&self) -> bool {
        self.id.is_valid()
    }
}

/// A builder for new transactions with the fields as the user entered them.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// The amount as text, e.g. "15.50".
    pub amount: String,
    /// The category name. Unknown names become [Category::Other].
    pub category: String,
    /// An optional description.
    pub description: Option<String>,
    /// When the transaction happened, as an RFC 3339 date-time or a
    /// `YYYY-MM-DD` date. Defaults to now.
    pub occurred_at: Option<String>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set when the transaction happened.
    pub fn occurred_at(mut self, occurred_at: &str) -> Self {
        self.occurred_at = Some(occurred_at.to_owned());
        self
    }

    /// Validate the fields and create the transaction with a fresh ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if the amount is not a number,
    /// - [Error::NegativeAmount] if the amount is less than zero,
    /// - or [Error::InvalidDateFormat] if the date cannot be parsed.
    pub(crate) fn finalise(self, now: OffsetDateTime) -> Result<Transaction, Error> {
        let amount = parse_amount(&self.amount)?;
        let occurred_at = parse_occurred_at(self.occurred_at.as_deref(), now)?;

        Ok(Transaction {
            id: TransactionId::generate(),
            amount,
            category: Category::from_name(&self.category),
            description: normalise_description(self.description),
            occurred_at,
        })
    }
}

/// A partial update to a transaction. Fields left as `None` are not changed,
/// and neither are a blank amount or date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    /// The new amount as text.
    pub amount: Option<String>,
    /// The new category name.
    pub category: Option<String>,
    /// The new description. An empty string removes the description.
    pub description: Option<String>,
    /// The new date, in the same formats as [TransactionBuilder::occurred_at].
    pub occurred_at: Option<String>,
}

impl TransactionPatch {
    /// Set the amount to change to.
    pub fn amount(mut self, amount: &str) -> Self {
        self.amount = Some(amount.to_owned());
        self
    }

    /// Set the category to change to.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    /// Set the description to change to.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set the date to change to.
    pub fn occurred_at(mut self, occurred_at: &str) -> Self {
        self.occurred_at = Some(occurred_at.to_owned());
        self
    }

    /// Merge the patch into `transaction`, returning the updated copy.
    ///
    /// All fields are validated before anything is merged, so `transaction` is
    /// only ever replaced by a fully valid record. The ID is never changed.
    ///
    /// # Errors
    /// Returns the same validation errors as [TransactionBuilder].
    pub(crate) fn apply_to(
        &self,
        transaction: &Transaction,
        now: OffsetDateTime,
    ) -> Result<Transaction, Error> {
        let amount = match self.amount.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => parse_amount(text)?,
            _ => transaction.amount,
        };

        let occurred_at = match self.occurred_at.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => parse_occurred_at(Some(text), now)?,
            _ => transaction.occurred_at,
        };

        let category = self
            .category
            .as_deref()
            .map(Category::from_name)
            .unwrap_or(transaction.category);

        let description = match &self.description {
            Some(description) => normalise_description(Some(description.clone())),
            None => transaction.description.clone(),
        };

        Ok(Transaction {
            id: transaction.id.clone(),
            amount,
            category,
            description,
            occurred_at,
        })
    }
}

// ============================================================================
// FIELD DEFAULTS
// ============================================================================

/// Parse an amount entered by the user.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if `text` is not a finite number,
/// - or [Error::NegativeAmount] if the number is less than zero.
pub fn parse_amount(text: &str) -> Result<f64, Error> {
    let amount: f64 = text
        .trim()
        .parse()
        .map_err(|_| Error::InvalidAmount(text.to_owned()))?;

    if !amount.is_finite() {
        return Err(Error::InvalidAmount(text.to_owned()));
    }

    if amount < 0.0 {
        return Err(Error::NegativeAmount(amount));
    }

    Ok(amount)
}

/// Read an amount from storage, where a value that cannot be parsed counts as zero.
pub fn lenient_amount(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .unwrap_or(0.0)
}

/// Work out when a transaction happened from optional user input.
///
/// A missing or blank value means `now`. RFC 3339 date-times are converted to
/// the offset of `now`. A plain `YYYY-MM-DD` date takes the time of day from
/// `now`.
///
/// # Errors
/// Returns [Error::InvalidDateFormat] if `text` is neither format.
pub fn parse_occurred_at(text: Option<&str>, now: OffsetDateTime) -> Result<OffsetDateTime, Error> {
    let text = match text.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return Ok(now),
    };

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(date_time.to_offset(now.offset()));
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map(|date| date.with_time(now.time()).assume_offset(now.offset()))
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), text.to_owned()))
}

/// Trim a description and drop it if nothing is left.
pub fn normalise_description(description: Option<String>) -> Option<String> {
    description
        .map(|description| description.trim().to_owned())
        .filter(|description| !description.is_empty())
}

fn deserialize_lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoredAmount {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let amount = match StoredAmount::deserialize(deserializer)? {
        StoredAmount::Number(amount) if amount.is_finite() => amount,
        StoredAmount::Text(text) => lenient_amount(&text),
        StoredAmount::Number(_) | StoredAmount::Other(_) => 0.0,
    };

    Ok(amount)
}

// ============================================================================
// TESTS
// ============================================================================
