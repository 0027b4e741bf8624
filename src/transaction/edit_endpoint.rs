//! Defines the endpoint for replacing the fields of a transaction.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::UserID,
    db::DbPool,
    json::{ApiJson, ApiPath, MessageResponse},
    transaction::{TransactionForm, TransactionId, core::update_transaction},
};

/// A route handler for replacing every field of a transaction.
///
/// The body is validated the same way as when creating a transaction.
/// Responds with 404 if the transaction does not belong to the user.
pub async fn edit_transaction_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
    ApiJson(form): ApiJson<TransactionForm>,
) -> Response {
    match edit(&db_pool, transaction_id, user_id, form).await {
        Ok(()) => Json(MessageResponse::new("Transaction updated")).into_response(),
        Err(error) => error.into_response(),
    }
}

async fn edit(
    db_pool: &DbPool,
    transaction_id: TransactionId,
    user_id: UserID,
    form: TransactionForm,
) -> Result<(), Error> {
    let transaction = form.validate()?;
    let connection = db_pool.acquire().await?;

    update_transaction(transaction_id, user_id, &transaction, &connection)
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::put};
    use serde_json::json;
    use time::macros::date;

    use crate::{
        db::DbPool,
        endpoints::{self, format_endpoint},
        json::MessageResponse,
        test_utils::{get_test_db_pool, serve_as},
        transaction::{NewTransaction, TransactionKind, create_transaction, get_transaction},
    };

    use super::edit_transaction_endpoint;

    fn router() -> Router<DbPool> {
        Router::new().route(endpoints::TRANSACTION, put(edit_transaction_endpoint))
    }

    fn lunch() -> NewTransaction {
        NewTransaction {
            amount: 12.5,
            kind: TransactionKind::Expense,
            category: "Food".to_owned(),
            description: "Lunch".to_owned(),
            date: date!(2024 - 01 - 05),
        }
    }

    #[tokio::test]
    async fn can_edit_transaction() {
        let (db_pool, alice, _) = get_test_db_pool().await;
        let id = {
            let connection = db_pool.acquire().await.unwrap();
            create_transaction(alice, &lunch(), &connection).unwrap().id
        };
        let server = serve_as(alice, router(), db_pool.clone());

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, id))
            .json(&json!({
                "amount": 20,
                "type": "expense",
                "category": "Dining",
                "date": "2024-01-06",
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<MessageResponse>().message,
            "Transaction updated"
        );
        let connection = db_pool.acquire().await.unwrap();
        let got = get_transaction(id, alice, &connection).unwrap();
        assert_eq!(got.amount, 20.0);
        assert_eq!(got.category, "Dining");
        assert_eq!(got.description, "");
        assert_eq!(got.date, date!(2024 - 01 - 06));
    }

    #[tokio::test]
    async fn cannot_edit_another_users_transaction() {
        let (db_pool, alice, bob) = get_test_db_pool().await;
        let id = {
            let connection = db_pool.acquire().await.unwrap();
            create_transaction(alice, &lunch(), &connection).unwrap().id
        };
        let server = serve_as(bob, router(), db_pool.clone());

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, id))
            .json(&json!({
                "amount": 1,
                "type": "income",
                "category": "Stolen",
                "date": "2024-01-06",
            }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<MessageResponse>().message,
            "Transaction not found"
        );
        let connection = db_pool.acquire().await.unwrap();
        let unchanged = get_transaction(id, alice, &connection).unwrap();
        assert_eq!(unchanged.category, "Food");
        assert_eq!(unchanged.amount, 12.5);
    }

    #[tokio::test]
    async fn invalid_id_is_bad_request() {
        let (db_pool, alice, _) = get_test_db_pool().await;
        let server = serve_as(alice, router(), db_pool);

        server
            .put("/transaction/abc")
            .json(&json!({
                "amount": 1,
                "type": "income",
                "category": "Salary",
                "date": "2024-01-06",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn edit_is_validated() {
        let (db_pool, alice, _) = get_test_db_pool().await;
        let id = {
            let connection = db_pool.acquire().await.unwrap();
            create_transaction(alice, &lunch(), &connection).unwrap().id
        };
        let server = serve_as(alice, router(), db_pool);

        server
            .put(&format_endpoint(endpoints::TRANSACTION, id))
            .json(&json!({
                "amount": -3,
                "type": "expense",
                "category": "Food",
                "date": "2024-01-06",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
