//! The endpoint for logging in and receiving a token.

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{Credentials, TokenKeys, UserID, get_user_by_email},
    db::DbPool,
    json::ApiJson,
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The database connection pool.
    pub db_pool: DbPool,
    /// The keys for signing tokens.
    pub token_keys: TokenKeys,
    /// Whether users must verify their email before they can log in.
    pub require_verified_email: bool,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
            token_keys: state.token_keys.clone(),
            require_verified_email: state.auth_settings.require_verified_email,
        }
    }
}

/// The response body for a successful log-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInResponse {
    /// The signed token to send with requests to protected routes.
    pub token: String,
    /// The ID of the logged in user.
    pub user_id: UserID,
}

/// Handler for log-in requests via the POST method.
///
/// # Errors
///
/// This function will respond with an error in a few situations.
/// - The email or password is missing (400).
/// - No user is registered with the email (401).
/// - The password is not correct (401).
/// - Email verification is required and the user has not verified (401).
/// - An internal error occurred when verifying the password (500).
pub async fn post_log_in(
    State(state): State<LogInState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Response {
    match log_in(&state, credentials).await {
        Ok(response) => Json(response).into_response(),
        Err(error) => error.into_response(),
    }
}

async fn log_in(state: &LogInState, credentials: Credentials) -> Result<LogInResponse, Error> {
    let (email, password) = credentials.validate()?;

    let user = {
        let connection = state.db_pool.acquire().await?;
        get_user_by_email(&email, &connection)?
    };

    let password_hash = user.password_hash.clone();
    let is_password_correct = tokio::task::spawn_blocking(move || password_hash.verify(&password))
        .await
        .map_err(|error| Error::HashingError(error.to_string()))?
        .map_err(|error| {
            tracing::error!("Error verifying password: {error}");
            Error::HashingError(error.to_string())
        })?;

    if !is_password_correct {
        return Err(Error::InvalidCredentials);
    }

    if state.require_verified_email && !user.email_verified {
        return Err(Error::EmailNotVerified);
    }

    let token = state.token_keys.issue(user.id)?;
    tracing::debug!("User {} logged in", user.id);

    Ok(LogInResponse {
        token,
        user_id: user.id,
    })
}

#[cfg(test)]
mod log_in_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        auth::{PasswordHash, TokenKeys, create_user, verify_user_email},
        db::DbPool,
        json::MessageResponse,
    };

    use super::{LogInResponse, LogInState, post_log_in};

    async fn get_test_server(require_verified_email: bool) -> (TestServer, TokenKeys) {
        let db_pool = DbPool::open_in_memory().unwrap();
        {
            let connection = db_pool.acquire().await.unwrap();
            create_user(
                "foo@bar.baz",
                &PasswordHash::new("averysafeandsecurepassword", 4).unwrap(),
                "verify-me",
                &connection,
            )
            .unwrap();
        }

        let token_keys = TokenKeys::new("foobar", None);
        let state = LogInState {
            db_pool,
            token_keys: token_keys.clone(),
            require_verified_email,
        };
        let app = Router::new()
            .route("/login", post(post_log_in))
            .with_state(state);

        (
            TestServer::new(app).expect("Could not create test server."),
            token_keys,
        )
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let (server, token_keys) = get_test_server(false).await;

        let response = server
            .post("/login")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<LogInResponse>();
        let claims = token_keys.verify(&body.token).unwrap();
        assert_eq!(claims.id, body.user_id);
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let (server, _) = get_test_server(false).await;

        let response = server
            .post("/login")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "definitelyNotTheCorrectPassword",
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body, json!({"message": "Wrong password"}));
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let (server, _) = get_test_server(false).await;

        let response = server
            .post("/login")
            .json(&json!({
                "email": "wrongemail@gmail.com",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<MessageResponse>().message, "User not found");
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_credentials() {
        let (server, _) = get_test_server(false).await;

        server
            .post("/login")
            .json(&json!({}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unverified_user_is_rejected_when_verification_required() {
        let (server, _) = get_test_server(true).await;

        let response = server
            .post("/login")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<MessageResponse>().message,
            "Please verify your email first"
        );
    }

    #[tokio::test]
    async fn verified_user_can_log_in_when_verification_required() {
        let db_pool = DbPool::open_in_memory().unwrap();
        {
            let connection = db_pool.acquire().await.unwrap();
            create_user(
                "foo@bar.baz",
                &PasswordHash::new("averysafeandsecurepassword", 4).unwrap(),
                "verify-me",
                &connection,
            )
            .unwrap();
            verify_user_email("verify-me", &connection).unwrap();
        }
        let state = LogInState {
            db_pool,
            token_keys: TokenKeys::new("foobar", None),
            require_verified_email: true,
        };
        let app = Router::new()
            .route("/login", post(post_log_in))
            .with_state(state);
        let server = TestServer::new(app).expect("Could not create test server.");

        server
            .post("/login")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status_ok();
    }
}
