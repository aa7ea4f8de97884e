use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, AuthError};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Message for every failed sign-in, so callers cannot probe which emails exist
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("An account with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account not found: {0}")]
    NotFound(Uuid),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type AccountResult<T> = Result<T, AccountError>;

/// Convert AccountError to AppError for standardized error responses
impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateEmail(email) => {
                AppError::Conflict(format!("An account with email '{}' already exists", email))
            }
            AccountError::InvalidCredentials => {
                AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            AccountError::NotFound(id) => AppError::NotFound(format!("Account {} not found", id)),
            AccountError::Validation(errors) => AppError::ValidationError(errors),
            AccountError::PasswordHash(msg) => {
                tracing::error!("Password hashing failed: {}", msg);
                AppError::InternalServerError("Failed to process credentials".to_string())
            }
            AccountError::Database(msg) => AppError::InternalServerError(msg),
            AccountError::Auth(e) => e.into(),
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
