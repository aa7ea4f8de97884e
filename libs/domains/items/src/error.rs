use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ItemError {
    /// Writing the photo to the image store failed
    #[error("{0}")]
    Upload(String),

    /// Inserting the report failed
    #[error("{0}")]
    Persistence(String),

    /// Listing, searching or loading reports failed
    #[error("{0}")]
    Query(String),

    #[error("{0}")]
    Delete(String),

    #[error("Item not found: {0}")]
    NotFound(Uuid),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    MultipartRejection(#[from] MultipartRejection),
}

pub type ItemResult<T> = Result<T, ItemError>;

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::Upload(msg) => AppError::UploadFailed(msg),
            ItemError::Persistence(msg) => AppError::PersistenceFailed(msg),
            ItemError::Query(msg) => AppError::QueryFailed(msg),
            ItemError::Delete(msg) => AppError::DeleteFailed(msg),
            ItemError::NotFound(id) => AppError::NotFound(format!("Item {} not found", id)),
            ItemError::Validation(errors) => AppError::ValidationError(errors),
            ItemError::InvalidInput(msg) => AppError::BadRequest(msg),
            ItemError::Forbidden(msg) => AppError::Forbidden(msg),
            ItemError::Multipart(e) => AppError::Multipart(e),
            ItemError::MultipartRejection(e) => AppError::MultipartRejection(e),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<StorageError> for ItemError {
    fn from(err: StorageError) -> Self {
        ItemError::Upload(err.to_string())
    }
}
