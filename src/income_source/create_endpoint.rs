//! Defines the endpoint for recording a new income source.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    db::DbPool,
    income_source::{IncomeSourceForm, IncomeSourceId, create_income_source},
    json::{ApiJson, CreatedResponse},
};

/// A route handler for creating an income source, responds with the new ID.
pub async fn create_income_source_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
    ApiJson(form): ApiJson<IncomeSourceForm>,
) -> Response {
    match create(&db_pool, user_id, form).await {
        Ok(id) => Json(CreatedResponse {
            message: "Income source saved".to_owned(),
            id,
        })
        .into_response(),
        Err(error) => error.into_response(),
    }
}

async fn create(
    db_pool: &DbPool,
    user_id: UserID,
    form: IncomeSourceForm,
) -> Result<IncomeSourceId, Error> {
    let new_income_source = form.validate()?;
    let connection = db_pool.acquire().await?;
    let income_source = create_income_source(
        user_id,
        &new_income_source,
        OffsetDateTime::now_utc(),
        &connection,
    )?;

    Ok(income_source.id)
}
