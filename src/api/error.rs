//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::pipeline::AnalysisError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

fn analysis_status(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AnalysisError::FileTooLarge { .. } | AnalysisError::UploadTooLarge { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        AnalysisError::EmptyFile | AnalysisError::NoInputProvided => StatusCode::BAD_REQUEST,
        AnalysisError::AnalysisInProgress => StatusCode::CONFLICT,
        AnalysisError::UpstreamServiceError(_)
        | AnalysisError::NoJsonFound
        | AnalysisError::MalformedJson(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::LowConfidenceParse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Analysis(AnalysisError::Internal(detail)) | ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Analysis(err) => (analysis_status(err), err.code(), err.user_message()),
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                detail.clone(),
            ),
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::AnalysisInProgress => ApiError::Analysis(AnalysisError::AnalysisInProgress),
            CoreError::UnknownTag(tag) => {
                ApiError::BadRequest(format!("Unknown symptom tag: {tag}"))
            }
        }
    }
}
