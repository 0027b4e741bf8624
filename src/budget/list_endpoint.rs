//! Route handlers for listing budgets and the spending against them.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    auth::UserID,
    budget::{get_budget_progress, get_budgets},
    db::DbPool,
};

/// A route handler for listing the user's budgets.
pub async fn list_budgets_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match db_pool.acquire().await {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match get_budgets(user_id, &connection) {
        Ok(budgets) => Json(budgets).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for the amount spent against each of the user's budgets.
pub async fn get_budget_progress_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match db_pool.acquire().await {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match get_budget_progress(user_id, &connection) {
        Ok(progress) => Json(progress).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};
    use serde_json::json;
    use time::macros::date;

    use crate::{
        budget::{BudgetUpsert, upsert_budget},
        db::DbPool,
        test_utils::{get_test_db_pool, serve_as},
        transaction::{NewTransaction, TransactionKind, create_transaction},
    };

    use super::{get_budget_progress_endpoint, list_budgets_endpoint};

    fn router() -> Router<DbPool> {
        Router::new()
            .route("/budgets", get(list_budgets_endpoint))
            .route("/budget-progress", get(get_budget_progress_endpoint))
    }

    #[tokio::test]
    async fn lists_only_own_budgets() {
        let (db_pool, alice, bob) = get_test_db_pool().await;
        let budget_id = {
            let mut connection = db_pool.acquire().await.unwrap();
            let budget = BudgetUpsert {
                category: "Food".to_owned(),
                amount: 200.0,
            };
            upsert_budget(bob, &budget, &mut connection).unwrap();
            upsert_budget(alice, &budget, &mut connection).unwrap().id
        };
        let server = serve_as(alice, router(), db_pool);

        let response = server.get("/budgets").await;

        response.assert_status_ok();
        response.assert_json(&json!([{
            "id": budget_id,
            "user_id": alice.as_i64(),
            "category": "Food",
            "amount": 200.0,
        }]));
    }

    #[tokio::test]
    async fn progress_reports_spent_per_budget() {
        let (db_pool, alice, _) = get_test_db_pool().await;
        {
            let mut connection = db_pool.acquire().await.unwrap();
            upsert_budget(
                alice,
                &BudgetUpsert {
                    category: "Food".to_owned(),
                    amount: 200.0,
                },
                &mut connection,
            )
            .unwrap();
            create_transaction(
                alice,
                &NewTransaction {
                    amount: 42.0,
                    kind: TransactionKind::Expense,
                    category: "food".to_owned(),
                    description: String::new(),
                    date: date!(2024 - 01 - 01),
                },
                &connection,
            )
            .unwrap();
        }
        let server = serve_as(alice, router(), db_pool);

        let response = server.get("/budget-progress").await;

        response.assert_status_ok();
        response.assert_json(&json!([{"category": "Food", "budget": 200.0, "spent": 42.0}]));
    }
}
