//! Filtering and listing a user's transactions.

use rusqlite::{Connection, ToSql};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    auth::UserID,
    json::{non_blank, parse_date},
};

use super::core::{Transaction, TransactionKind, map_transaction_row};

/// The raw query string parameters for listing transactions.
///
/// Blank values are treated as if the parameter was not given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    /// Only include "income" or "expense" transactions.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Only include transactions whose category contains this text.
    #[serde(default)]
    pub category: Option<String>,
    /// Only include transactions on or after this date.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Only include transactions on or before this date.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Only include transactions whose description or category contains this text.
    #[serde(default)]
    pub search: Option<String>,
}

/// Validated filters for [get_transactions], combined with AND.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Exact match on the kind.
    pub kind: Option<TransactionKind>,
    /// Case-insensitive substring of the category.
    pub category: Option<String>,
    /// Inclusive lower bound on the date.
    pub start_date: Option<Date>,
    /// Inclusive upper bound on the date.
    pub end_date: Option<Date>,
    /// Case-insensitive substring of the description or category.
    pub search: Option<String>,
}

impl TryFrom<TransactionQuery> for TransactionFilter {
    type Error = Error;

    fn try_from(query: TransactionQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: non_blank(query.kind).map(|kind| kind.parse()).transpose()?,
            category: non_blank(query.category).map(|category| category.trim().to_owned()),
            start_date: non_blank(query.start_date)
                .map(|date| parse_date("startDate", &date))
                .transpose()?,
            end_date: non_blank(query.end_date)
                .map(|date| parse_date("endDate", &date))
                .transpose()?,
            search: non_blank(query.search).map(|search| search.trim().to_owned()),
        })
    }
}

/// Wrap `text` in wildcards for a LIKE pattern, escaping any wildcards it contains.
fn contains_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{escaped}%")
}

/// Get the transactions of `user_id` that match every filter in `filter`.
///
/// Transactions are sorted by date, newest first, and then by ID, newest
/// first, so that the order is stable for transactions on the same day.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub fn get_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let user_id = user_id.as_i64();
    let category_pattern = filter.category.as_deref().map(contains_pattern);
    let search_pattern = filter.search.as_deref().map(contains_pattern);

    let mut query = String::from(
        "SELECT id, user_id, amount, type, category, description, date \
        FROM \"transaction\" WHERE user_id = ?",
    );
    let mut params: Vec<&dyn ToSql> = vec![&user_id];

    if let Some(kind) = &filter.kind {
        query.push_str(" AND type = ?");
        params.push(kind);
    }

    if let Some(pattern) = &category_pattern {
        query.push_str(" AND category LIKE ? ESCAPE '\\'");
        params.push(pattern);
    }

    if let Some(start_date) = &filter.start_date {
        query.push_str(" AND date >= ?");
        params.push(start_date);
    }

    if let Some(end_date) = &filter.end_date {
        query.push_str(" AND date <= ?");
        params.push(end_date);
    }

    if let Some(pattern) = &search_pattern {
        query.push_str(" AND (description LIKE ? ESCAPE '\\' OR category LIKE ? ESCAPE '\\')");
        params.push(pattern);
        params.push(pattern);
    }

    query.push_str(" ORDER BY date DESC, id DESC");

    connection
        .prepare(&query)?
        .query_map(params.as_slice(), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}
