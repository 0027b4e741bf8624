//! The endpoint for confirming a user's email with their verification token.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    auth::verify_user_email,
    db::DbPool,
    json::{ApiJson, MessageResponse, non_blank},
};

/// The request body for verifying an email.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    /// The token given to the user at registration.
    #[serde(default)]
    pub token: Option<String>,
}

/// A route handler for verifying a user's email.
///
/// Responds with 404 if no user holds the token, which includes tokens that
/// have already been used.
pub async fn post_verify_email(
    State(db_pool): State<DbPool>,
    ApiJson(request): ApiJson<VerifyEmailRequest>,
) -> Response {
    let Some(token) = non_blank(request.token) else {
        return Error::MissingFields("Verification token required").into_response();
    };

    let connection = match db_pool.acquire().await {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match verify_user_email(token.trim(), &connection) {
        Ok(()) => Json(MessageResponse::new("Email verified successfully")).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        auth::{PasswordHash, create_user, get_user_by_email},
        db::DbPool,
        json::MessageResponse,
    };

    use super::post_verify_email;

    async fn get_test_server() -> (TestServer, DbPool) {
        let db_pool = DbPool::open_in_memory().unwrap();
        {
            let connection = db_pool.acquire().await.unwrap();
            create_user(
                "foo@bar.baz",
                &PasswordHash::new_unchecked("hunter2"),
                "abc123",
                &connection,
            )
            .unwrap();
        }
        let app = Router::new()
            .route("/verify-email", post(post_verify_email))
            .with_state(db_pool.clone());

        (
            TestServer::new(app).expect("Could not create test server."),
            db_pool,
        )
    }

    #[tokio::test]
    async fn verify_email_succeeds_with_valid_token() {
        let (server, db_pool) = get_test_server().await;

        let response = server
            .post("/verify-email")
            .json(&json!({"token": "abc123"}))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<MessageResponse>().message,
            "Email verified successfully"
        );
        let connection = db_pool.acquire().await.unwrap();
        let user = get_user_by_email("foo@bar.baz", &connection).unwrap();
        assert!(user.email_verified);
    }

    #[tokio::test]
    async fn verify_email_fails_with_unknown_token() {
        let (server, _) = get_test_server().await;

        server
            .post("/verify-email")
            .json(&json!({"token": "not-a-token"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn verify_email_token_cannot_be_reused() {
        let (server, _) = get_test_server().await;
        server
            .post("/verify-email")
            .json(&json!({"token": "abc123"}))
            .await
            .assert_status_ok();

        server
            .post("/verify-email")
            .json(&json!({"token": "abc123"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn verify_email_fails_with_missing_token() {
        let (server, _) = get_test_server().await;

        server
            .post("/verify-email")
            .json(&json!({}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
