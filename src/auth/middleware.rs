//! Authentication middleware that validates the token sent with each request.

use axum::{
    extract::{FromRef, Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, Error, auth::TokenKeys};

/// The custom header that carries the token.
pub const TOKEN_HEADER: &str = "token";

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The keys for verifying tokens.
    pub token_keys: TokenKeys,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
        }
    }
}

/// Get the raw token from the request headers.
///
/// The `token` header is preferred. Otherwise the `Authorization` header is
/// used with or without a `Bearer ` prefix.
fn get_token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let token = match headers.get(TOKEN_HEADER) {
        Some(value) => value.to_str().ok()?,
        None => {
            let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
            value.strip_prefix("Bearer ").unwrap_or(value)
        }
    };

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware function that checks for a valid token.
///
/// The user ID is placed into the request and then the request executed
/// normally if the token is valid, otherwise a 401 JSON error is returned
/// without running the handler.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let Some(token) = get_token_from_headers(request.headers()) else {
        return Error::MissingToken.into_response();
    };

    let claims = match state.token_keys.verify(token) {
        Ok(claims) => claims,
        Err(error) => return error.into_response(),
    };

    let (mut parts, body) = request.into_parts();
    parts.extensions.insert(claims.id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}
