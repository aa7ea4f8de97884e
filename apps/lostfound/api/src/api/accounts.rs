//! Auth API routes

use axum::Router;
use domain_accounts::{AccountService, PgAccountRepository, handlers};

use crate::state::AppState;

/// Create auth router
pub fn router(state: &AppState) -> Router {
    let repository = PgAccountRepository::new(state.db.clone());
    let service = AccountService::new(
        repository,
        state.jwt_auth.clone(),
        state.config.accounts.clone(),
    );
    handlers::router(service)
}
