//! `{success, ...}` JSON envelopes shared by the trivia and coffee-shop APIs.

use crate::coffee::auth::AuthError;
use crate::error::StoreError;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum ApiError {
    /// The detail is logged, never returned to the client.
    #[error("bad request")]
    BadRequest(String),

    #[error("resource not found")]
    NotFound,

    #[error("this method is not allowed")]
    MethodNotAllowed,

    #[error("unprocessable")]
    Unprocessable(String),

    #[error("Internal server error")]
    Internal(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(err) => err.status,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_constraint() {
            ApiError::Unprocessable(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Auth(err) => json!({
                "code": err.code,
                "description": err.description,
            }),
            other => Value::String(other.to_string()),
        };

        match &self {
            ApiError::Internal(detail) => error!("Request failed: {detail}"),
            ApiError::BadRequest(detail) | ApiError::Unprocessable(detail) => {
                debug!("Rejected request ({}): {detail}", status.as_u16())
            }
            ApiError::Auth(err) => debug!("Authorization failed: {err}"),
            _ => {}
        }

        (
            status,
            Json(json!({
                "success": false,
                "error": status.as_u16(),
                "message": message,
            })),
        )
            .into_response()
    }
}

/// Parse a request body as a JSON value. Empty or malformed bodies are bad requests.
pub fn json_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("request body is empty".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}

/// Route ids are integers; anything else cannot name a resource.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::NotFound)
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Rewrites the router's bare 405 responses into the JSON envelope.
pub async fn envelope_method_not_allowed(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        ApiError::MethodNotAllowed.into_response()
    } else {
        response
    }
}
