//! Type-safe error codes for API responses.
//!
//! Each code carries a SCREAMING_SNAKE_CASE identifier for clients, an integer
//! for logs and dashboards, and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::UploadFailed;
//! assert_eq!(code.as_str(), "UPLOAD_FAILED");
//! assert_eq!(code.code(), 2001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1499)
    /// Request validation failed
    ValidationError,

    /// Invalid UUID format in path parameter
    InvalidUuid,

    /// JSON body could not be extracted
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// Request was malformed in a way not covered by a more specific code
    BadRequest,

    /// Authentication credentials are missing or invalid
    Unauthorized,

    /// Authenticated caller lacks permission
    Forbidden,

    /// Request conflicts with current resource state (e.g., duplicate account)
    Conflict,

    /// Multipart body could not be read
    InvalidMultipart,

    // Server errors (1500-1999)
    /// An unexpected internal server error occurred
    InternalError,

    /// A dependency is temporarily unavailable
    ServiceUnavailable,

    // Object storage errors (2000s)
    /// Image could not be written to object storage
    UploadFailed,

    // Persistence errors (3000s)
    /// Record could not be written
    PersistenceFailed,

    /// Records could not be read
    QueryFailed,

    /// Record could not be removed
    DeleteFailed,
}

impl ErrorCode {
    /// Identifier clients match on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::InvalidMultipart => "INVALID_MULTIPART",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::UploadFailed => "UPLOAD_FAILED",
            Self::PersistenceFailed => "PERSISTENCE_FAILED",
            Self::QueryFailed => "QUERY_FAILED",
            Self::DeleteFailed => "DELETE_FAILED",
        }
    }

    /// Integer code for structured logs.
    ///
    /// - 1000-1499: client errors
    /// - 1500-1999: server errors
    /// - 2000-2999: object storage
    /// - 3000-3999: persistence
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::BadRequest => 1005,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::Conflict => 1008,
            Self::InvalidMultipart => 1009,

            Self::InternalError => 1500,
            Self::ServiceUnavailable => 1503,

            Self::UploadFailed => 2001,

            Self::PersistenceFailed => 3001,
            Self::QueryFailed => 3002,
            Self::DeleteFailed => 3003,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::Conflict => "Resource already exists",
            Self::InvalidMultipart => "Failed to read multipart body",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::UploadFailed => "Image upload failed",
            Self::PersistenceFailed => "Failed to save record",
            Self::QueryFailed => "Failed to load records",
            Self::DeleteFailed => "Failed to delete record",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
