//! Application state management.
//!
//! This module defines the shared application state the routers are built from.
//! The state contains:
//! - Configuration
//! - Database connections (PostgreSQL, optional Redis)
//! - Session token verification and revocation
//! - The photo store

use axum_helpers::JwtAuth;
use domain_items::ImageStore;
use std::sync::Arc;

/// Shared application state.
///
/// Cloning is cheap: every field is a handle to a shared pool or an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Redis connection manager, when `REDIS_URL` is set
    pub redis: Option<database::redis::ConnectionManager>,
    /// Issues, verifies and revokes session tokens
    pub jwt_auth: JwtAuth,
    /// Where uploaded photos are written
    pub images: Arc<dyn ImageStore>,
}
