//! The request body shared by the create and edit transaction endpoints.

use serde::Deserialize;

use crate::{
    Error,
    json::{non_blank, parse_date},
    transaction::{NewTransaction, TransactionKind},
};

/// The JSON body for creating or replacing a transaction.
///
/// Every field is optional here so that a missing field can be reported
/// with a helpful message rather than a generic parse error.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    /// The amount of money, must be positive.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Either "income" or "expense".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// The category label.
    #[serde(default)]
    pub category: Option<String>,
    /// An optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// The date in the format `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
}

impl TransactionForm {
    /// Check the form and convert it into a [NewTransaction].
    ///
    /// # Errors
    ///
    /// Returns an [Error::MissingFields] if the amount, type, category or date
    /// is missing, or an [Error::InvalidField] if one of them has an unusable value.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let (Some(amount), Some(kind), Some(category), Some(date)) = (
            self.amount,
            non_blank(self.kind),
            non_blank(self.category),
            non_blank(self.date),
        ) else {
            return Err(Error::MissingFields("Missing required fields"));
        };

        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidField(
                "Amount must be a positive number".to_owned(),
            ));
        }

        let kind: TransactionKind = kind.parse()?;
        let date = parse_date("date", &date)?;

        Ok(NewTransaction {
            amount,
            kind,
            category: category.trim().to_owned(),
            description: self
                .description
                .map(|description| description.trim().to_owned())
                .unwrap_or_default(),
            date,
        })
    }
}
