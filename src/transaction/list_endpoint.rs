//! Route handler for listing transactions with optional filters.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::UserID,
    db::DbPool,
    json::ApiQuery,
    transaction::{Transaction, TransactionFilter, TransactionQuery, get_transactions},
};

/// A route handler for listing the user's transactions, optionally filtered
/// by the query string parameters `type`, `category`, `startDate`, `endDate`
/// and `search`.
pub async fn list_transactions_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Response {
    match list(&db_pool, user_id, query).await {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_response(),
    }
}

async fn list(
    db_pool: &DbPool,
    user_id: UserID,
    query: TransactionQuery,
) -> Result<Vec<Transaction>, Error> {
    let filter = TransactionFilter::try_from(query)?;
    let connection = db_pool.acquire().await?;

    get_transactions(user_id, &filter, &connection)
}
