//! Defines the endpoint for setting the budget of a category.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    auth::UserID,
    budget::{BudgetUpsert, upsert_budget},
    db::DbPool,
    json::{ApiJson, MessageResponse, non_blank},
};

/// The JSON body for setting a budget.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetForm {
    /// The category the budget applies to.
    #[serde(default)]
    pub category: Option<String>,
    /// The amount to budget, must not be negative.
    #[serde(default)]
    pub amount: Option<f64>,
}

impl BudgetForm {
    /// Check the form and convert it into a [BudgetUpsert].
    ///
    /// # Errors
    ///
    /// Returns an [Error::MissingFields] if the category or amount is missing,
    /// or an [Error::InvalidField] if the amount is negative or not finite.
    pub fn validate(self) -> Result<BudgetUpsert, Error> {
        let (Some(category), Some(amount)) = (non_blank(self.category), self.amount) else {
            return Err(Error::MissingFields("Category and amount required"));
        };

        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidField(
                "Amount must be zero or a positive number".to_owned(),
            ));
        }

        Ok(BudgetUpsert {
            category: category.trim().to_owned(),
            amount,
        })
    }
}

/// A route handler for creating or replacing the user's budget for a category.
pub async fn upsert_budget_endpoint(
    State(db_pool): State<DbPool>,
    Extension(user_id): Extension<UserID>,
    ApiJson(form): ApiJson<BudgetForm>,
) -> Response {
    match upsert(&db_pool, user_id, form).await {
        Ok(()) => Json(MessageResponse::new("Budget saved")).into_response(),
        Err(error) => error.into_response(),
    }
}

async fn upsert(db_pool: &DbPool, user_id: UserID, form: BudgetForm) -> Result<(), Error> {
    let budget = form.validate()?;
    let mut connection = db_pool.acquire().await?;
    let saved = upsert_budget(user_id, &budget, &mut connection)?;
    tracing::debug!("User {user_id} set budget {} to {}", saved.id, saved.amount);

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use serde_json::json;

    use crate::{
        Error,
        budget::get_budgets,
        db::DbPool,
        json::MessageResponse,
        test_utils::{get_test_db_pool, serve_as},
    };

    use super::{BudgetForm, upsert_budget_endpoint};

    fn router() -> Router<DbPool> {
        Router::new().route("/budget", post(upsert_budget_endpoint))
    }

    #[tokio::test]
    async fn upsert_twice_keeps_latest_amount() {
        let (db_pool, alice, _) = get_test_db_pool().await;
        let server = serve_as(alice, router(), db_pool.clone());

        for amount in [200, 250] {
            let response = server
                .post("/budget")
                .json(&json!({"category": "Food", "amount": amount}))
                .await;
            response.assert_status_ok();
            assert_eq!(response.json::<MessageResponse>().message, "Budget saved");
        }

        let connection = db_pool.acquire().await.unwrap();
        let budgets = get_budgets(alice, &connection).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, 250.0);
    }

    #[tokio::test]
    async fn missing_category_is_rejected() {
        let (db_pool, alice, _) = get_test_db_pool().await;
        let server = serve_as(alice, router(), db_pool);

        server
            .post("/budget")
            .json(&json!({"category": " ", "amount": 10}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[test]
    fn negative_and_non_finite_amounts_are_rejected() {
        for amount in [-1.0, f64::NAN, f64::NEG_INFINITY] {
            let form = BudgetForm {
                category: Some("Food".to_owned()),
                amount: Some(amount),
            };

            assert!(
                matches!(form.validate(), Err(Error::InvalidField(_))),
                "{amount}"
            );
        }
    }

    #[test]
    fn zero_amount_is_allowed() {
        let form = BudgetForm {
            category: Some("Food".to_owned()),
            amount: Some(0.0),
        };

        assert!(form.validate().is_ok());
    }

    #[test]
    fn missing_amount_is_rejected() {
        let form = BudgetForm {
            category: Some("Food".to_owned()),
            amount: None,
        };

        assert_eq!(
            form.validate(),
            Err(Error::MissingFields("Category and amount required"))
        );
    }
}
