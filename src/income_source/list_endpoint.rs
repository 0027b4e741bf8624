//! Route handler for listing income sources.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{auth::UserID, db::DbPool, income_source::get_income_sources};

/// A route handler for listing the user's income sources, newest first.
pub async fn list_income_sources_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match db_pool.acquire().await {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match get_income_sources(user_id, &connection) {
        Ok(income_sources) => Json(income_sources).into_response(),
        Err(error) => error.into_response(),
    }
}
