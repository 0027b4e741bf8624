//! Route handler for deleting an income source.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    auth::UserID,
    db::DbPool,
    income_source::{IncomeSourceId, delete_income_source},
    json::{ApiPath, MessageResponse},
};

/// A route handler for deleting an income source.
///
/// Responds with 404 if the income source does not belong to the user.
pub async fn delete_income_source_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
    ApiPath(income_source_id): ApiPath<IncomeSourceId>,
) -> Response {
    let connection = match db_pool.acquire().await {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match delete_income_source(income_source_id, user_id, &connection) {
        Ok(()) => Json(MessageResponse::new("Income source deleted")).into_response(),
        Err(error) => error.into_response(),
    }
}
