//! Defines the income source model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, auth::UserID};

/// The ID of an income source in the application database.
pub type IncomeSourceId = i64;

/// A recurring source of income, such as a salary or a rental property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSource {
    /// The ID of the income source.
    pub id: IncomeSourceId,
    /// The user that recorded the income source.
    pub user_id: UserID,
    /// The name of the source, e.g. "Salary".
    pub source_name: String,
    /// The amount received each time.
    pub amount: f64,
    /// How often the income is received, e.g. "monthly".
    pub frequency: String,
    /// When the income is next expected.
    pub next_date: Date,
    /// Whether the income is still being received.
    pub is_active: bool,
    /// When the income source was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The validated fields for a new income source.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncomeSource {
    /// A non-empty name.
    pub source_name: String,
    /// A positive amount.
    pub amount: f64,
    /// A non-empty frequency.
    pub frequency: String,
    /// When the income is next expected.
    pub next_date: Date,
}

/// The validated changes to an income source.
///
/// Fields set to `None` keep their stored value, except for `is_active`
/// which is always written.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeSourceUpdate {
    /// The new name.
    pub source_name: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new frequency.
    pub frequency: Option<String>,
    /// The new next date.
    pub next_date: Option<Date>,
    /// Whether the income is still being received.
    pub is_active: bool,
}

/// Create the income source table.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_income_source_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS income_source (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                source_name TEXT NOT NULL,
                amount REAL NOT NULL,
                frequency TEXT NOT NULL,
                next_date TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_income_source_row(row: &Row) -> Result<IncomeSource, rusqlite::Error> {
    Ok(IncomeSource {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        source_name: row.get(2)?,
        amount: row.get(3)?,
        frequency: row.get(4)?,
        next_date: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Create an active income source for `user_id` recorded at `created_at`.
///
/// # Errors
/// This function will return a:
/// - [Error::ConstraintViolation] if `user_id` does not refer to a user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_income_source(
    user_id: UserID,
    income_source: &NewIncomeSource,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<IncomeSource, Error> {
    let income_source = connection
        .prepare(
            "INSERT INTO income_source
                (user_id, source_name, amount, frequency, next_date, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
             RETURNING id, user_id, source_name, amount, frequency, next_date, is_active, created_at",
        )?
        .query_row(
            (
                user_id.as_i64(),
                &income_source.source_name,
                income_source.amount,
                &income_source.frequency,
                income_source.next_date,
                created_at,
            ),
            map_income_source_row,
        )?;

    Ok(income_source)
}

/// Get the income sources of `user_id`, most recently recorded first.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn get_income_sources(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<IncomeSource>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, source_name, amount, frequency, next_date, is_active, created_at
             FROM income_source WHERE user_id = :user_id
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_income_source_row)?
        .map(|income_source_result| income_source_result.map_err(Error::from))
        .collect()
}

/// Get the income source `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingIncomeSource] if `id` does not refer to an income source owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_income_source(
    id: IncomeSourceId,
    user_id: UserID,
    connection: &Connection,
) -> Result<IncomeSource, Error> {
    connection
        .prepare(
            "SELECT id, user_id, source_name, amount, frequency, next_date, is_active, created_at
             FROM income_source WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_income_source_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::MissingIncomeSource,
            error => error.into(),
        })
}

/// Apply `update` to the income source `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingIncomeSource] if `id` does not refer to an income source owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_income_source(
    id: IncomeSourceId,
    user_id: UserID,
    update: &IncomeSourceUpdate,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE income_source SET
            source_name = COALESCE(?1, source_name),
            amount = COALESCE(?2, amount),
            frequency = COALESCE(?3, frequency),
            next_date = COALESCE(?4, next_date),
            is_active = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            &update.source_name,
            update.amount,
            &update.frequency,
            update.next_date,
            update.is_active,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::MissingIncomeSource);
    }

    Ok(())
}

/// Delete the income source `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingIncomeSource] if `id` does not refer to an income source owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_income_source(
    id: IncomeSourceId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM income_source WHERE id = :id AND user_id = :user_id",
        &[(":id", &id), (":user_id", &user_id.as_i64())],
    )?;

    if rows_affected == 0 {
        return Err(Error::MissingIncomeSource);
    }

    Ok(())
}
