pub mod codes;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Every non-2xx JSON response from the API has this shape:
///
/// ```json
/// {
///   "code": 2001,
///   "error": "UPLOAD_FAILED",
///   "message": "Failed to write image: permission denied",
///   "details": null
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<serde_json::Value>,
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own error enums into this type; the
/// conversion decides the status code and the handler never builds a
/// response body by hand.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Multipart rejection: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// The status this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::MultipartRejection(e) => e.status(),
            AppError::Multipart(e) => e.status(),
            AppError::ValidationError(_) | AppError::UuidError(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UploadFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::PersistenceFailed(_)
            | AppError::QueryFailed(_)
            | AppError::DeleteFailed(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, details, code) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (e.body_text(), None, ErrorCode::JsonExtraction)
            }
            AppError::MultipartRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidMultipart.code(),
                    "Multipart rejection: {:?}",
                    e
                );
                (e.body_text(), None, ErrorCode::InvalidMultipart)
            }
            AppError::Multipart(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidMultipart.code(),
                    "Multipart error: {:?}",
                    e
                );
                (e.body_text(), None, ErrorCode::InvalidMultipart)
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                    ErrorCode::ValidationError,
                )
            }
            AppError::UuidError(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidUuid.code(),
                    "UUID error: {:?}",
                    e
                );
                (
                    ErrorCode::InvalidUuid.default_message().to_string(),
                    None,
                    ErrorCode::InvalidUuid,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                (msg, None, ErrorCode::BadRequest)
            }
            AppError::Unauthorized(msg) => {
                tracing::info!("Unauthorized: {}", msg);
                (msg, None, ErrorCode::Unauthorized)
            }
            AppError::Forbidden(msg) => {
                tracing::info!("Forbidden: {}", msg);
                (msg, None, ErrorCode::Forbidden)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (msg, None, ErrorCode::NotFound)
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {}", msg);
                (msg, None, ErrorCode::Conflict)
            }
            AppError::UploadFailed(msg) => {
                tracing::error!(
                    error_code = ErrorCode::UploadFailed.code(),
                    "Upload failed: {}",
                    msg
                );
                (msg, None, ErrorCode::UploadFailed)
            }
            AppError::PersistenceFailed(msg) => {
                tracing::error!(
                    error_code = ErrorCode::PersistenceFailed.code(),
                    "Persistence failed: {}",
                    msg
                );
                (msg, None, ErrorCode::PersistenceFailed)
            }
            AppError::QueryFailed(msg) => {
                tracing::error!(
                    error_code = ErrorCode::QueryFailed.code(),
                    "Query failed: {}",
                    msg
                );
                (msg, None, ErrorCode::QueryFailed)
            }
            AppError::DeleteFailed(msg) => {
                tracing::error!(
                    error_code = ErrorCode::DeleteFailed.code(),
                    "Delete failed: {}",
                    msg
                );
                (msg, None, ErrorCode::DeleteFailed)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (msg, None, ErrorCode::InternalError)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (msg, None, ErrorCode::ServiceUnavailable)
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Router fallback that renders unknown routes in the standard error shape.
pub async fn not_found_fallback() -> AppError {
    AppError::NotFound(ErrorCode::NotFound.default_message().to_string())
}
