//! Route handler for editing an income source.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::UserID,
    db::DbPool,
    income_source::{EditIncomeSourceForm, IncomeSourceId, update_income_source},
    json::{ApiJson, ApiPath, MessageResponse},
};

/// A route handler for editing an income source.
///
/// Omitted fields keep their value, except `is_active` which is set to true
/// when omitted. Responds with 404 if the income source does not belong to the user.
pub async fn edit_income_source_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
    ApiPath(income_source_id): ApiPath<IncomeSourceId>,
    ApiJson(form): ApiJson<EditIncomeSourceForm>,
) -> Response {
    match edit(&db_pool, income_source_id, user_id, form).await {
        Ok(()) => Json(MessageResponse::new("Income source updated")).into_response(),
        Err(error) => error.into_response(),
    }
}

async fn edit(
    db_pool: &DbPool,
    income_source_id: IncomeSourceId,
    user_id: UserID,
    form: EditIncomeSourceForm,
) -> Result<(), Error> {
    let update = form.validate()?;
    let connection = db_pool.acquire().await?;

    update_income_source(income_source_id, user_id, &update, &connection)
}
