//! Defines the budget model and its database queries.

use rusqlite::{Connection, Row, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserID};

/// The ID of a budget in the application database.
pub type BudgetId = i64;

/// A spending limit for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The user that set the budget.
    pub user_id: UserID,
    /// The category the budget applies to, compared case-insensitively.
    pub category: String,
    /// The amount the user plans to spend in the category.
    pub amount: f64,
}

/// A validated request to set the budget for a category.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUpsert {
    /// A non-empty category label.
    pub category: String,
    /// A non-negative amount.
    pub amount: f64,
}

/// How much of a budget has been spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    /// The category of the budget.
    pub category: String,
    /// The budgeted amount.
    pub budget: f64,
    /// The sum of the user's expenses in the category.
    pub spent: f64,
}

/// Create the budget table.
///
/// A user has at most one budget per category, where "Food" and "food"
/// count as the same category.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL COLLATE NOCASE,
                amount REAL NOT NULL,
                UNIQUE(user_id, category),
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        amount: row.get(3)?,
    })
}

/// Set the budget of `user_id` for a category, replacing the amount if the
/// user already has a budget for that category.
///
/// The update and insert run in one immediate transaction so that
/// concurrent upserts for the same category cannot both insert.
///
/// # Errors
/// This function will return a:
/// - [Error::ConstraintViolation] if `user_id` does not refer to a user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn upsert_budget(
    user_id: UserID,
    budget: &BudgetUpsert,
    connection: &mut Connection,
) -> Result<Budget, Error> {
    let transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let updated = transaction
        .prepare(
            "UPDATE budget SET amount = ?1 WHERE user_id = ?2 AND category = ?3
             RETURNING id, user_id, category, amount",
        )?
        .query_row(
            (budget.amount, user_id.as_i64(), &budget.category),
            map_budget_row,
        );

    let saved = match updated {
        Ok(saved) => saved,
        Err(rusqlite::Error::QueryReturnedNoRows) => transaction
            .prepare(
                "INSERT INTO budget (user_id, category, amount) VALUES (?1, ?2, ?3)
                 RETURNING id, user_id, category, amount",
            )?
            .query_row(
                (user_id.as_i64(), &budget.category, budget.amount),
                map_budget_row,
            )?,
        Err(error) => return Err(error.into()),
    };

    transaction.commit()?;

    Ok(saved)
}

/// Get all budgets of `user_id` sorted by category.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn get_budgets(user_id: UserID, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount FROM budget
             WHERE user_id = :user_id ORDER BY category, id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_budget_row)?
        .map(|budget_result| budget_result.map_err(Error::from))
        .collect()
}

/// Get the amount spent against each budget of `user_id`, sorted by category.
///
/// An expense counts towards a budget if it belongs to the same user and
/// its category matches the budget's category ignoring case.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn get_budget_progress(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<BudgetProgress>, Error> {
    connection
        .prepare(
            "SELECT b.category, b.amount, COALESCE(SUM(t.amount), 0.0)
             FROM budget b
             LEFT JOIN \"transaction\" t
               ON t.category = b.category COLLATE NOCASE
               AND t.type = 'expense'
               AND t.user_id = b.user_id
             WHERE b.user_id = ?1
             GROUP BY b.id
             ORDER BY b.category",
        )?
        .query_map((user_id.as_i64(),), |row| {
            Ok(BudgetProgress {
                category: row.get(0)?,
                budget: row.get(1)?,
                spent: row.get(2)?,
            })
        })?
        .map(|progress_result| progress_result.map_err(Error::from))
        .collect()
}
