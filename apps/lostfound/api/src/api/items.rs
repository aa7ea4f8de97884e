//! Items API routes

use axum::{Router, middleware::from_fn_with_state};
use axum_helpers::optional_jwt_auth_middleware;
use domain_items::{ItemService, PgItemRepository, handlers};

use crate::state::AppState;

/// Create items router
///
/// Reads are public; handlers that need a caller reject anonymous requests
/// themselves, so the session is attached here but not required.
pub fn router(state: &AppState) -> Router {
    let repository = PgItemRepository::new(state.db.clone());
    let service = ItemService::new(repository, state.images.clone())
        .with_max_image_bytes(state.config.images.max_bytes);

    handlers::router(service).layer(from_fn_with_state(
        state.jwt_auth.clone(),
        optional_jwt_auth_middleware,
    ))
}
