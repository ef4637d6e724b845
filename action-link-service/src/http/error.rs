use action_link_api::ApiError;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Error body of the tenant endpoints: `{"error": code, "message"?: detail}`.
#[derive(Debug)]
pub struct PlainError(pub ApiError);

/// Error body of the token-holder endpoints: `{"ok": false, "error": code}`.
#[derive(Debug)]
pub struct EnvelopeError(pub ApiError);

impl From<ApiError> for PlainError {
    fn from(error: ApiError) -> Self {
        Self(error)
    }
}

impl From<ApiError> for EnvelopeError {
    fn from(error: ApiError) -> Self {
        Self(error)
    }
}

impl IntoResponse for PlainError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.0.code() });
        if let Some(message) = self.0.public_detail() {
            body["message"] = json!(message);
        }
        respond(&self.0, body)
    }
}

impl IntoResponse for EnvelopeError {
    fn into_response(self) -> Response {
        let mut body = json!({ "ok": false, "error": self.0.code() });
        if let Some(message) = self.0.public_detail() {
            body["message"] = json!(message);
        }
        respond(&self.0, body)
    }
}

fn respond(error: &ApiError, body: serde_json::Value) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, axum::Json(body)).into_response();
    if let ApiError::RateLimited { retry_after_secs } = error {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(*retry_after_secs));
    }
    response
}
