use crate::errors::AppError;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures while issuing, reading or revoking session tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has been revoked")]
    Revoked,

    #[error("Failed to issue token: {0}")]
    Issue(String),

    #[error("Token store unavailable: {0}")]
    Store(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            // The reason stays in the logs; clients get one message for every rejected token.
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::Revoked => {
                tracing::debug!(reason = %err, "Rejected session token");
                AppError::Unauthorized("Authentication required".to_string())
            }
            AuthError::Issue(msg) => AppError::InternalServerError(msg),
            AuthError::Store(msg) => AppError::ServiceUnavailable(msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(err: redis::RedisError) -> Self {
        AuthError::Store(err.to_string())
    }
}
