//! Middleware for logging requests and responses.

use axum::{
    Json,
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use serde_json::Value;

use crate::{Error, json::MessageResponse};

/// The fields whose values are replaced before a JSON body is logged.
const REDACTED_FIELDS: [&str; 3] = ["password", "token", "verificationToken"];

const REDACTED_VALUE: &str = "********";

/// The largest request body the server reads, in bytes.
pub const REQUEST_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords and tokens in JSON bodies are redacted, and request headers are
/// not logged since they carry the auth token.
///
/// Request bodies over [REQUEST_BODY_LIMIT] bytes are rejected with a 413.
/// Only JSON response bodies are buffered and logged, so static files are
/// streamed through untouched.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, REQUEST_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(error) => {
            let error = error.into_inner();
            if error.downcast_ref::<LengthLimitError>().is_some() {
                tracing::warn!(
                    "Rejected request body over {REQUEST_BODY_LIMIT} bytes: {} {}",
                    parts.method,
                    parts.uri
                );
                return Error::PayloadTooLarge.into_response();
            }

            tracing::warn!("Could not read request body: {error}");
            return Error::InvalidBody(error.to_string()).into_response();
        }
    };

    log_request(&parts, &redact_body(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    if !is_json(response.headers()) {
        tracing::info!("Sending response: {}", response.status());
        return response;
    }

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Server error")),
            )
                .into_response();
        }
    };

    log_response(&parts, &redact_body(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"))
}

/// Get the body as text, with credentials replaced if the body is JSON.
fn redact_body(body: &Bytes) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(mut json) => {
            redact_json(&mut json);
            json.to_string()
        }
        Err(_) => String::from_utf8_lossy(body).to_string(),
    }
}

fn redact_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *field = Value::String(REDACTED_VALUE.to_owned());
                } else {
                    redact_json(field);
                }
            }
        }
        Value::Array(values) => values.iter_mut().for_each(redact_json),
        _ => {}
    }
}

const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Cut `text` to at most [LOG_BODY_LENGTH_LIMIT] bytes on a character boundary.
fn truncate(text: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_request(parts: &request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            truncate(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            truncate(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        body::Bytes,
        http::StatusCode,
        middleware,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::{
        LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware, redact_body, truncate,
    };

    #[test]
    fn redacts_passwords_and_tokens() {
        let body = Bytes::from(
            json!({"email": "foo@bar.baz", "password": "hunter2", "nested": {"token": "abc"}})
                .to_string(),
        );

        let got: Value = serde_json::from_str(&redact_body(&body)).unwrap();

        assert_eq!(
            got,
            json!({"email": "foo@bar.baz", "password": "********", "nested": {"token": "********"}})
        );
    }

    #[test]
    fn non_json_bodies_are_unchanged() {
        let body = Bytes::from_static(b"password=hunter2");

        assert_eq!(redact_body(&body), "password=hunter2");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "é".repeat(LOG_BODY_LENGTH_LIMIT);

        let got = truncate(&text);

        assert!(got.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(got.chars().all(|c| c == 'é'));
    }

    #[tokio::test]
    async fn middleware_passes_body_through() {
        async fn echo(Json(body): Json<Value>) -> Json<Value> {
            Json(body)
        }
        let app = Router::new()
            .route("/echo", post(echo))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app).expect("Could not create test server.");
        let body = json!({"password": "hunter2"});

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        response.assert_json(&body);
    }

    #[tokio::test]
    async fn non_json_response_passes_through() {
        let app = Router::new()
            .route("/text", get(|| async { "plain text" }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server.get("/text").await;

        response.assert_status_ok();
        response.assert_text("plain text");
    }

    #[tokio::test]
    async fn oversized_request_body_is_rejected() {
        async fn echo(body: Bytes) -> Bytes {
            body
        }
        let app = Router::new()
            .route("/echo", post(echo))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server
            .post("/echo")
            .bytes(Bytes::from(vec![b'a'; REQUEST_BODY_LIMIT + 1]))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        response.assert_json(&json!({"message": "Request body too large"}));
    }
}
