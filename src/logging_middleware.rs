// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode
//!
//! Journal text never reaches the log: any JSON field named `content` is replaced
//! before the body is printed.

use axum::body::to_bytes;
use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use serde_json::Value;
use tracing::{debug, Level};

const REDACTED: &str = "[redacted]";

/// Replace every `content` field in a JSON document, at any depth
pub fn redact_content(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if key == "content" {
                    *field = Value::String(REDACTED.to_string());
                } else {
                    redact_content(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_content),
        _ => {}
    }
}

/// Printable form of a body, or None when it should not be logged
fn loggable_body(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }

    let mut json = serde_json::from_slice::<Value>(bytes).ok()?;
    redact_content(&mut json);
    Some(serde_json::to_string_pretty(&json).unwrap_or_else(|_| REDACTED.to_string()))
}

/// Middleware to log request and response bodies in debug mode
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !tracing::enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Some(body) = loggable_body(&bytes) {
        debug!(method = %parts.method, uri = %parts.uri, request_body = %body, "📥 Request");
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Some(body) = loggable_body(&bytes) {
        debug!(status = %parts.status, response_body = %body, "📤 Response");
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
