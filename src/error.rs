//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::json::MessageResponse;

/// The errors that may occur in the application.
///
/// Each variant maps to exactly one HTTP status code, see [Error::status_code].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more required fields were missing from the request body.
    ///
    /// The string is the message shown to the client, e.g. "Missing required fields".
    #[error("{0}")]
    MissingFields(&'static str),

    /// A field was present but its value could not be used, e.g. a negative
    /// amount or a date that is not in the format `YYYY-MM-DD`.
    #[error("{0}")]
    InvalidField(String),

    /// The request body could not be parsed as JSON of the expected shape.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The request body was larger than the server accepts.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// A path parameter, such as a transaction ID, could not be parsed.
    #[error("invalid path parameter: {0}")]
    InvalidPath(String),

    /// The email used to register is already taken by another user.
    #[error("User already exists")]
    DuplicateEmail,

    /// No user is registered with the email used to log in.
    #[error("User not found")]
    UnknownEmail,

    /// The password did not match the stored hash.
    #[error("Wrong password")]
    InvalidCredentials,

    /// The user tried to log in before verifying their email while
    /// verification is required.
    #[error("Please verify your email first")]
    EmailNotVerified,

    /// A protected route was requested without a token.
    #[error("No token provided")]
    MissingToken,

    /// The token was malformed, had a bad signature or has expired.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// No user holds the email verification token.
    #[error("Invalid verification token")]
    InvalidVerificationToken,

    /// No transaction with the ID exists for the authenticated user.
    #[error("Transaction not found")]
    MissingTransaction,

    /// No income source with the ID exists for the authenticated user.
    #[error("Income source not found")]
    MissingIncomeSource,

    /// The query string could not be parsed.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// The requested route does not exist.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A write was rejected by a table constraint, e.g. a foreign key that
    /// does not refer to a user.
    #[error("the database rejected the write: {0}")]
    ConstraintViolation(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The auth token could not be signed.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// Could not check out a connection from the database pool.
    #[error("could not acquire a database connection")]
    DatabasePoolError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// The HTTP status code used when this error is sent to a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields(_)
            | Error::InvalidField(_)
            | Error::InvalidBody(_)
            | Error::InvalidPath(_)
            | Error::InvalidQuery(_)
            | Error::DuplicateEmail
            | Error::ConstraintViolation(_) => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::UnknownEmail
            | Error::InvalidCredentials
            | Error::EmailNotVerified
            | Error::MissingToken
            | Error::InvalidToken => StatusCode::UNAUTHORIZED,
            Error::InvalidVerificationToken
            | Error::MissingTransaction
            | Error::MissingIncomeSource
            | Error::NotFound => StatusCode::NOT_FOUND,
            Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::DatabasePoolError
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, description)
                if sql_error.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let description = description.unwrap_or_else(|| sql_error.to_string());
                tracing::warn!("a write violated a table constraint: {description}");
                Error::ConstraintViolation(description)
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidPath(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            Error::ConstraintViolation(_) => "Failed to save changes".to_owned(),
            // Internal details are logged, not shown to the client.
            Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::DatabasePoolError
            | Error::SqlError(_) => {
                tracing::error!("An unexpected error occurred: {}", self);
                "Server error".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

/// Respond to requests for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
