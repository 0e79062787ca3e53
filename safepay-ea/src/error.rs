//! Error types for safepay-ea
//!
//! One service-wide error enum carrying the failure taxonomy the gateway
//! reports to callers. Every component error converts into [`ApiError`],
//! which renders as `{ "error": <kind>, "details": <message> }` with the
//! matching HTTP status. The `error` kind is machine-readable and stable;
//! `details` is for humans.

use crate::services::dispatcher::DispatchError;
use crate::services::intake::IntakeError;
use crate::services::registry::RegistryError;
use crate::services::transcription_client::TranscribeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use safepay_common::api::types::ErrorBody;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Evidence failed validation (400)
    #[error("Invalid evidence: {0}")]
    InvalidEvidence(String),

    /// No backend registered for the modality (500, routing table bug)
    #[error("Unknown modality: {0}")]
    UnknownModality(String),

    /// Audio upload to the transcription provider failed (502)
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Submitting or checking the transcript job failed (502)
    #[error("Transcription request failed: {0}")]
    TranscriptionRequestFailed(String),

    /// The provider failed the job or completed without text (502)
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    /// The job never finished within the polling budget (502)
    #[error("Transcription timed out: {0}")]
    TranscriptionTimeout(String),

    /// Analysis backend unreachable (502)
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Analysis backend answered with an error; its status is echoed
    #[error("Backend error {status}: {message}")]
    BackendError { status: u16, message: String },

    /// IO error (500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// safepay-common error (500)
    #[error("Common error: {0}")]
    Common(#[from] safepay_common::Error),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status, stable error kind, and human-readable details
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::InvalidEvidence(msg) => (StatusCode::BAD_REQUEST, "invalid_evidence", msg),
            ApiError::UnknownModality(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "unknown_modality", msg)
            }
            ApiError::UploadFailed(msg) => (StatusCode::BAD_GATEWAY, "upload_failed", msg),
            ApiError::TranscriptionRequestFailed(msg) => (
                StatusCode::BAD_GATEWAY,
                "transcription_request_failed",
                msg,
            ),
            ApiError::TranscriptionFailed(msg) => {
                (StatusCode::BAD_GATEWAY, "transcription_failed", msg)
            }
            ApiError::TranscriptionTimeout(msg) => {
                (StatusCode::BAD_GATEWAY, "transcription_timeout", msg)
            }
            ApiError::BackendUnavailable(msg) => {
                (StatusCode::BAD_GATEWAY, "backend_unavailable", msg)
            }
            ApiError::BackendError { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "backend_error",
                message,
            ),
            ApiError::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                err.to_string(),
            ),
            ApiError::Common(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                err.to_string(),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, details) = self.parts();
        (status, Json(ErrorBody::new(kind, details))).into_response()
    }
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::StagingFailed(msg) => ApiError::Internal(msg),
            other => ApiError::InvalidEvidence(other.to_string()),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError::UnknownModality(err.to_string())
    }
}

impl From<TranscribeError> for ApiError {
    fn from(err: TranscribeError) -> Self {
        match err {
            TranscribeError::UploadFailed(msg) => ApiError::UploadFailed(msg),
            TranscribeError::RequestFailed(msg) => ApiError::TranscriptionRequestFailed(msg),
            TranscribeError::JobFailed(msg) => ApiError::TranscriptionFailed(msg),
            timeout @ TranscribeError::Timeout { .. } => {
                ApiError::TranscriptionTimeout(timeout.to_string())
            }
            TranscribeError::Cancelled => {
                ApiError::TranscriptionFailed("request cancelled".to_string())
            }
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Unavailable(msg) => ApiError::BackendUnavailable(msg),
            DispatchError::Upstream { status, message } => {
                ApiError::BackendError { status, message }
            }
            DispatchError::MalformedResponse(msg) => ApiError::BackendError {
                status: 502,
                message: format!("response was not valid JSON: {msg}"),
            },
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
