//! Session tokens for the API.
//!
//! - [`JwtAuth`] signs and verifies HS256 tokens
//! - [`TokenStore`] remembers signed-out tokens (Redis or in-memory)
//! - [`jwt_auth_middleware`] / [`optional_jwt_auth_middleware`] attach [`JwtClaims`]
//! - [`AuthUser`] hands the claims to handlers
//!
//! ```ignore
//! let config = JwtConfig::from_env()?;
//! let auth = JwtAuth::new(&config, Arc::new(InMemoryTokenStore::new()));
//!
//! let protected = Router::new()
//!     .route("/me", get(me))
//!     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod store;

pub use config::{ACCESS_TOKEN_TTL, JwtConfig};
pub use error::{AuthError, AuthResult};
pub use extractor::AuthUser;
pub use jwt::{ADMIN_ROLE, IssuedToken, JwtAuth, JwtClaims};
pub use middleware::{
    ACCESS_TOKEN_COOKIE, extract_token_from_headers, jwt_auth_middleware,
    optional_jwt_auth_middleware,
};
pub use store::{InMemoryTokenStore, RedisTokenStore, TokenStore};
