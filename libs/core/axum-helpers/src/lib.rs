//! # Axum Helpers
//!
//! Shared HTTP plumbing for the lost-and-found API.
//!
//! - **[`auth`]**: JWT sessions, revocation stores, auth middleware and extractor
//! - **[`server`]**: documented router, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: `AppError` and the JSON error shape
//! - **[`extractors`]**: UUID path and validated JSON
//! - **[`audit`]**: audit trail on the `audit` tracing target
//!
//! ```ignore
//! let router = axum_helpers::create_router::<ApiDoc>(api_routes)?;
//! let app = router.merge(axum_helpers::health_router(core_config::app_info!()));
//! axum_helpers::create_production_app(app, &server, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    ACCESS_TOKEN_COOKIE, ADMIN_ROLE, AuthError, AuthUser, InMemoryTokenStore, IssuedToken,
    JwtAuth, JwtClaims, JwtConfig, RedisTokenStore, TokenStore, jwt_auth_middleware,
    optional_jwt_auth_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{UuidPath, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
