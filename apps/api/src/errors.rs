use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Validation and content-defect variants carry messages the caller can act
/// on directly. Remote/storage variants log their detail internally and
/// surface a generic message, so upstream internals never leak.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Job description text is empty")]
    EmptyInput,

    #[error("No text could be extracted from '{file_name}'")]
    EmptyExtraction { file_name: String },

    #[error("Job description is too short: {length} characters (minimum {minimum})")]
    TooShort { length: usize, minimum: usize },

    #[error("Analysis engine error (status {status}): {body}")]
    RemoteAnalysis { status: u16, body: String },

    #[error("Analysis engine timed out after {seconds}s")]
    AnalysisTimeout { seconds: u64 },

    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::Api { status, body } => AppError::RemoteAnalysis { status, body },
            AnalysisError::Timeout { seconds } => AppError::AnalysisTimeout { seconds },
            AnalysisError::Parse(err) => AppError::MalformedResponse(err.to_string()),
            // Transport failures short of a timeout carry no upstream status.
            AnalysisError::Http(err) => AppError::RemoteAnalysis {
                status: 0,
                body: err.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::EmptyInput => (
                StatusCode::BAD_REQUEST,
                "EMPTY_INPUT",
                self.to_string(),
            ),
            AppError::EmptyExtraction { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_EXTRACTION",
                self.to_string(),
            ),
            AppError::TooShort { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "TEXT_TOO_SHORT",
                self.to_string(),
            ),
            AppError::RemoteAnalysis { status, body } => {
                tracing::error!("Analysis engine error (status {status}): {body}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ANALYSIS_ERROR",
                    "The analysis service is unavailable, please try again later".to_string(),
                )
            }
            AppError::AnalysisTimeout { seconds } => {
                tracing::error!("Analysis engine timed out after {seconds}s");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "ANALYSIS_TIMEOUT",
                    "The analysis service timed out, please try again later".to_string(),
                )
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed analysis response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_ANALYSIS_RESPONSE",
                    "The analysis service returned an unexpected response".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred, please try again later".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred, please try again later".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
