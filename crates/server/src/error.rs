//! HTTP error mapping.
//!
//! Internal errors are logged here and replaced with fixed messages; the
//! response body never carries upstream detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use supportbot_core::AppError;

/// Message returned for a request without question text.
pub const QUESTION_REQUIRED: &str = "Question is required.";

/// Message returned for a body over the size limit.
pub const QUESTION_TOO_LONG: &str = "Question is too long.";

/// Message returned when the answer service fails.
pub const SERVICE_UNAVAILABLE: &str =
    "An error occurred while communicating with the AI service.";

/// Errors surfaced to HTTP callers.
#[derive(Debug)]
pub enum ApiError {
    /// The request carried no usable question.
    QuestionRequired,
    /// The request body exceeded the configured limit.
    TooLarge,
    /// Answering failed; the cause stays in the logs.
    Upstream(AppError),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::Upstream(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::QuestionRequired => (StatusCode::BAD_REQUEST, QUESTION_REQUIRED),
            ApiError::TooLarge => (StatusCode::PAYLOAD_TOO_LARGE, QUESTION_TOO_LONG),
            ApiError::Upstream(err) => {
                tracing::error!("Error processing chat request: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, SERVICE_UNAVAILABLE)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
