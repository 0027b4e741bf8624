//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::UserID,
    db::DbPool,
    json::{ApiJson, CreatedResponse},
    transaction::{TransactionForm, core::create_transaction},
};

/// A route handler for creating a new transaction, responds with the new ID.
pub async fn create_transaction_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
    ApiJson(form): ApiJson<TransactionForm>,
) -> Response {
    match create(&db_pool, user_id, form).await {
        Ok(id) => Json(CreatedResponse {
            message: "Transaction saved".to_owned(),
            id,
        })
        .into_response(),
        Err(error) => error.into_response(),
    }
}

async fn create(db_pool: &DbPool, user_id: UserID, form: TransactionForm) -> Result<i64, Error> {
    let new_transaction = form.validate()?;
    let connection = db_pool.acquire().await?;
    let transaction = create_transaction(user_id, &new_transaction, &connection)?;
    tracing::debug!("User {user_id} created transaction {}", transaction.id);

    Ok(transaction.id)
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use serde_json::json;
    use time::macros::date;

    use crate::{
        json::{CreatedResponse, MessageResponse},
        test_utils::{get_test_db_pool, serve_as},
        transaction::{TransactionKind, get_transaction},
    };

    use super::create_transaction_endpoint;

    fn router() -> Router<crate::db::DbPool> {
        Router::new().route("/transaction", post(create_transaction_endpoint))
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (db_pool, alice, _) = get_test_db_pool().await;
        let server = serve_as(alice, router(), db_pool.clone());

        let response = server
            .post("/transaction")
            .json(&json!({
                "amount": 12.5,
                "type": "expense",
                "category": "Food",
                "description": "Lunch",
                "date": "2024-01-05",
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<CreatedResponse>();
        assert_eq!(body.message, "Transaction saved");

        let connection = db_pool.acquire().await.unwrap();
        let transaction = get_transaction(body.id, alice, &connection).unwrap();
        assert_eq!(transaction.amount, 12.5);
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.category, "Food");
        assert_eq!(transaction.description, "Lunch");
        assert_eq!(transaction.date, date!(2024 - 01 - 05));
    }

    #[tokio::test]
    async fn description_is_optional() {
        let (db_pool, alice, _) = get_test_db_pool().await;
        let server = serve_as(alice, router(), db_pool.clone());

        let response = server
            .post("/transaction")
            .json(&json!({
                "amount": 100,
                "type": "income",
                "category": "Salary",
                "date": "2024-01-01",
            }))
            .await;

        response.assert_status_ok();
        let id = response.json::<CreatedResponse>().id;
        let connection = db_pool.acquire().await.unwrap();
        assert_eq!(
            get_transaction(id, alice, &connection).unwrap().description,
            ""
        );
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let (db_pool, alice, _) = get_test_db_pool().await;
        let server = serve_as(alice, router(), db_pool);

        let response = server
            .post("/transaction")
            .json(&json!({"amount": 12.5, "type": "expense"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<MessageResponse>().message,
            "Missing required fields"
        );
    }

    #[tokio::test]
    async fn invalid_type_is_rejected() {
        let (db_pool, alice, _) = get_test_db_pool().await;
        let server = serve_as(alice, router(), db_pool);

        server
            .post("/transaction")
            .json(&json!({
                "amount": 12.5,
                "type": "gift",
                "category": "Food",
                "date": "2024-01-05",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
