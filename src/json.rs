//! Extractors that report rejections as JSON, and the common response bodies.

use axum::extract::{FromRequest, FromRequestParts};
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::Error;

/// A JSON body extractor whose rejections are reported as [Error::InvalidBody]
/// so that clients always receive a JSON error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// A path parameter extractor whose rejections are reported as
/// [Error::InvalidPath].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

/// A query string extractor whose rejections are reported as
/// [Error::InvalidQuery].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

/// A response body containing only a human readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// The message for the client.
    pub message: String,
}

impl MessageResponse {
    /// Create a message body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The response body for endpoints that create a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedResponse {
    /// The message for the client.
    pub message: String,
    /// The ID of the new row.
    pub id: i64,
}

/// Returns `Some` only if `value` is present and contains a non-whitespace character.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Parse a calendar date in the format `YYYY-MM-DD`.
///
/// `field` names the request field in the error message.
pub(crate) fn parse_date(field: &str, value: &str) -> Result<Date, Error> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        Error::InvalidField(format!(
            "\"{value}\" is not a valid {field}, expected a date like 2024-01-31"
        ))
    })
}
