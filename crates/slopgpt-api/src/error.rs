//! API error type and its JSON response.
//!
//! Every failure is rendered as `{ "error": "<message>" }`. Messages are
//! meant for the visitor; internal detail is logged where the error is
//! raised and never put in the body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use slopgpt_chat::ChatError;
use slopgpt_lead::LeadError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400 - malformed or incomplete request.
    #[error("{0}")]
    BadRequest(String),
    /// 405 - endpoint only accepts POST.
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// 413 - body over the configured limit.
    #[error("Request body too large")]
    PayloadTooLarge,
    /// 429 - per-second request budget exhausted.
    #[error("Rate limit exceeded")]
    TooManyRequests,
    /// 500 - downstream failure; the message is generic.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        if err.is_validation() {
            return ApiError::BadRequest(err.to_string());
        }
        tracing::error!(error = %err, "Chat request failed");
        ApiError::Internal("Failed to process chat request".to_string())
    }
}

impl From<LeadError> for ApiError {
    fn from(err: LeadError) -> Self {
        match err {
            LeadError::MissingRequiredFields => ApiError::BadRequest(err.to_string()),
            other => {
                tracing::error!(error = %other, "Lead submission failed");
                ApiError::Internal("Failed to submit lead".to_string())
            }
        }
    }
}
