//! JSON handlers for the vault routes.
//!
//! Each handler decodes the body into the endpoint's request DTO, invokes the
//! endpoint, and encodes the result. A body that cannot be read or decoded
//! never reaches the capability, and is answered with the error envelope.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::AppState;
use crate::service::Endpoint;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Body written for every failed request.
///
/// Field order is part of the wire format.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub status_code: u16,
    pub status_text: &'static str,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or(""),
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes).into_response(),
        Err(e) => {
            let envelope = ErrorEnvelope::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
            // The envelope only holds strings and an integer.
            let bytes = serde_json::to_vec(&envelope).unwrap_or_default();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, JSON_CONTENT_TYPE)],
                bytes,
            )
                .into_response()
        }
    }
}

fn respond_error(status: StatusCode, error: impl Into<String>) -> Response {
    json_response(status, &ErrorEnvelope::new(status, error))
}

/// Decode, dispatch, encode.
async fn serve_json<Req, Resp>(
    endpoint: &Endpoint<Req, Resp>,
    error_status: StatusCode,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    Req: DeserializeOwned,
    Resp: Serialize,
{
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "rejecting unreadable request body");
            return respond_error(rejection.status(), rejection.body_text());
        }
    };

    let request: Req = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "rejecting undecodable request body");
            return respond_error(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match endpoint.invoke(request).await {
        Ok(response) => json_response(StatusCode::OK, &response),
        Err(err) => respond_error(error_status, err.to_string()),
    }
}

/// `POST /v1/hash`
pub async fn hash_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    serve_json(&state.endpoints.hash, state.error_status, body).await
}

/// `POST /v1/validate`
pub async fn validate_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    serve_json(&state.endpoints.validate, state.error_status, body).await
}

/// `POST /v1/login`
pub async fn login_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    serve_json(&state.endpoints.login, state.error_status, body).await
}
