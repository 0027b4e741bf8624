//! Expense totals per category for drawing charts.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserID, db::DbPool};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category label.
    pub category: String,
    /// The sum of the expenses in the category.
    pub total: f64,
}

/// Sum the expenses of `user_id` by category, sorted by category.
///
/// Categories differing only in case are counted as one.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn get_expenses_by_category(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT category, SUM(amount) FROM \"transaction\"
             WHERE user_id = ?1 AND type = 'expense'
             GROUP BY category
             ORDER BY category",
        )?
        .query_map((user_id.as_i64(),), |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .map(|total_result| total_result.map_err(Error::from))
        .collect()
}

/// A route handler for the user's expense totals by category.
pub async fn get_chart_data_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match db_pool.acquire().await {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match get_expenses_by_category(user_id, &connection) {
        Ok(totals) => Json(totals).into_response(),
        Err(error) => error.into_response(),
    }
}
