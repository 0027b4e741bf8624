//! Route handler for deleting a transaction.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    auth::UserID,
    db::DbPool,
    json::{ApiPath, MessageResponse},
    transaction::{TransactionId, core::delete_transaction},
};

/// A route handler for deleting a transaction.
///
/// Responds with 404 if the transaction does not belong to the user.
pub async fn delete_transaction_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Response {
    let connection = match db_pool.acquire().await {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match delete_transaction(transaction_id, user_id, &connection) {
        Ok(()) => Json(MessageResponse::new("Transaction deleted")).into_response(),
        Err(error) => {
            tracing::debug!("Could not delete transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}
