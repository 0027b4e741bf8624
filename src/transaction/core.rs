//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, auth::UserID};

// ============================================================================
// MODELS
// ============================================================================

/// The ID of a transaction in the application database.
pub type TransactionId = i64;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The name of the kind as stored in the database and sent to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(Error::InvalidField(format!(
                "\"{other}\" is not a valid type, expected \"income\" or \"expense\""
            ))),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income belonging to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// The amount of money earned or spent, always positive.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// A label used for grouping, e.g. "Groceries".
    pub category: String,
    /// A free text description, empty if none was given.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
}

/// The validated fields of a transaction that is about to be created or
/// that replaces an existing transaction.
///
/// Build one from a request body with [crate::transaction::TransactionForm::validate].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A positive amount of money.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// A non-empty category label.
    pub category: String,
    /// Defaults to the empty string.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// Categories are compared case-insensitively so that "Food" and "food"
/// are grouped together and match the same budget.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL COLLATE NOCASE,
                description TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Every query filters by user and most sort by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction for `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::ConstraintViolation] if `user_id` does not refer to a user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, amount, type, category, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, amount, type, category, description, date",
        )?
        .query_row(
            (
                user_id.as_i64(),
                transaction.amount,
                transaction.kind,
                &transaction.category,
                &transaction.description,
                transaction.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction `id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, type, category, description, date
             FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::MissingTransaction,
            error => error.into(),
        })
}

/// Replace every field of the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET amount = ?1, type = ?2, category = ?3, description = ?4, date = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            transaction.amount,
            transaction.kind,
            &transaction.category,
            &transaction.description,
            transaction.date,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::MissingTransaction);
    }

    Ok(())
}

/// Delete the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        &[(":id", &id), (":user_id", &user_id.as_i64())],
    )?;

    if rows_affected == 0 {
        return Err(Error::MissingTransaction);
    }

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Expects the columns id, user_id, amount, type, category, description, date.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let amount = row.get(2)?;
    let kind = row.get(3)?;
    let category = row.get(4)?;
    let description = row.get(5)?;
    let date = row.get(6)?;

    Ok(Transaction {
        id,
        user_id,
        amount,
        kind,
        category,
        description,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================
