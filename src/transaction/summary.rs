//! Totals of a user's income and expenses.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserID, db::DbPool};

/// The total income and expenses of a user over all time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all income.
    pub income: f64,
    /// The sum of all expenses.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

/// Sum the income and expenses of `user_id`, zero if they have no transactions.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn get_summary(user_id: UserID, connection: &Connection) -> Result<Summary, Error> {
    let (income, expense): (f64, f64) = connection.query_row(
        "SELECT
            COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END), 0.0),
            COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END), 0.0)
         FROM \"transaction\" WHERE user_id = ?1",
        (user_id.as_i64(),),
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(Summary {
        income,
        expense,
        balance: income - expense,
    })
}

/// A route handler for getting the user's [Summary].
pub async fn get_summary_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match db_pool.acquire().await {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match get_summary(user_id, &connection) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
    }
}
