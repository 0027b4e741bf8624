//! The endpoint for registering a new user.

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AppState, Error,
    auth::{PasswordHash, create_user},
    db::DbPool,
    json::{ApiJson, non_blank},
};

/// The state needed for registering a user.
#[derive(Debug, Clone)]
pub struct RegisterState {
    /// The database connection pool.
    pub db_pool: DbPool,
    /// The bcrypt cost used for hashing the password.
    pub password_cost: u32,
    /// Whether to send the email verification token back to the client.
    pub expose_verification_token: bool,
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
            password_cost: state.auth_settings.password_cost,
            expose_verification_token: state.auth_settings.expose_verification_token,
        }
    }
}

/// The email and password sent to register or log in.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    /// The user's email address.
    #[serde(default)]
    pub email: Option<String>,
    /// The raw password.
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    /// Check both fields are present, returning the trimmed email and the password.
    pub(crate) fn validate(self) -> Result<(String, String), Error> {
        match (non_blank(self.email), non_blank(self.password)) {
            (Some(email), Some(password)) => Ok((email.trim().to_owned(), password)),
            _ => Err(Error::MissingFields("Email and password required")),
        }
    }
}

/// The response body for a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// The message for the client.
    pub message: String,
    /// The email verification token.
    ///
    /// Only included when the server is configured to expose it, since
    /// normally the token would be sent to the user by email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
}

/// Create a random, single-use email verification token of 32 hex characters.
fn generate_verification_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A route handler for registering a new user.
///
/// # Errors
///
/// Responds with a:
/// - 400 if the email or password is missing, the email is not a valid
///   address, or the email is already registered,
/// - or 500 if the password could not be hashed or the database failed.
pub async fn register_user(
    State(state): State<RegisterState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Response {
    match register(&state, credentials).await {
        Ok(response) => Json(response).into_response(),
        Err(error) => error.into_response(),
    }
}

async fn register(state: &RegisterState, credentials: Credentials) -> Result<RegisterResponse, Error> {
    let (email, password) = credentials.validate()?;

    if !EmailAddress::is_valid(&email) {
        return Err(Error::InvalidField(format!("\"{email}\" is not a valid email address")));
    }

    let cost = state.password_cost;
    let password_hash = tokio::task::spawn_blocking(move || PasswordHash::new(&password, cost))
        .await
        .map_err(|error| Error::HashingError(error.to_string()))??;
    let verification_token = generate_verification_token();

    let connection = state.db_pool.acquire().await?;
    let user = create_user(&email, &password_hash, &verification_token, &connection)?;
    tracing::info!("Registered user {}", user.id);

    Ok(RegisterResponse {
        message: "Registered successfully. Please verify your email.".to_owned(),
        verification_token: state
            .expose_verification_token
            .then_some(verification_token),
    })
}
