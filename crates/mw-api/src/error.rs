//! Unified API error type with Axum `IntoResponse` support.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use mw_protocol::ErrorBody;

use crate::analysis::AnalysisError;

/// API error type that converts to proper HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The AI provider failed or answered with something unusable.
    #[error("{message}: {details}")]
    Upstream { message: String, details: String },

    #[error("{message}: {details}")]
    Internal { message: String, details: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Upstream { message, details } => {
                (StatusCode::BAD_GATEWAY, message, Some(details))
            }
            ApiError::Internal { message, details } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, Some(details))
            }
        };

        let body = ErrorBody {
            error,
            details,
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::EmptyBatch => ApiError::BadRequest(err.to_string()),
            AnalysisError::Ai(_) | AnalysisError::MalformedResponse(_) => ApiError::Upstream {
                message: "AI error".into(),
                details: err.to_string(),
            },
            AnalysisError::Cache(_) => ApiError::Internal {
                message: "cache error".into(),
                details: err.to_string(),
            },
        }
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;
