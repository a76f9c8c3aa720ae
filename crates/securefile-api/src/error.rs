//! API error types and conversions
//!
//! Validation failures are not errors at this layer: they travel inside an
//! `UploadResult`. `ApiError` covers requests that never reach the pipeline.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use securefile_core::ErrorCategory;
use serde::Serialize;

use crate::csrf::TokenError;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request (malformed multipart body)
    BadRequest(String),
    /// 400 Bad Request (anti-forgery token check failed)
    Forgery(TokenError),
    /// 413 Payload Too Large
    PayloadTooLarge(String),
    /// 500 Internal Server Error
    Internal(String),
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<ErrorCategory>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, category) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Forgery(err) => (StatusCode::BAD_REQUEST, "csrf", err.to_string(), None),
            ApiError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "too_large",
                msg,
                Some(ErrorCategory::TooLarge),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg,
                None,
            ),
        };

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(error = error_type, %message, "API error");
        } else if status.is_client_error() {
            tracing::debug!(error = error_type, %message, "API client error");
        }

        let body = Json(ErrorResponse {
            success: false,
            error: message,
            category,
        });

        (status, body).into_response()
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidKey => ApiError::Internal(err.to_string()),
            other => ApiError::Forgery(other),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => {
                ApiError::PayloadTooLarge("Request body too large".to_string())
            }
            status if status.is_server_error() => ApiError::Internal(err.body_text()),
            _ => ApiError::BadRequest(err.body_text()),
        }
    }
}
