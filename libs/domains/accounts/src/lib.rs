//! Accounts Domain
//!
//! The auth provider: sign-up, sign-in, sign-out and the current account.
//! Passwords are hashed with argon2id; sessions are JWTs issued by
//! [`axum_helpers::JwtAuth`] and revoked through its token store.
//!
//! Accounts whose email is listed in `ADMIN_EMAILS` get the `admin` role at
//! sign-up, which is what the items domain checks before marking an item
//! retrieved.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_accounts::{AccountService, AccountsConfig, PgAccountRepository, handlers};
//!
//! let service = AccountService::new(PgAccountRepository::new(db), jwt_auth, AccountsConfig::from_env()?);
//! let router = handlers::router(service);
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use config::AccountsConfig;
pub use error::{AccountError, AccountResult};
pub use handlers::ApiDoc;
pub use models::{
    Account, AccountResponse, NewAccount, Role, Session, SessionResponse, SignInRequest,
    SignUpRequest, normalize_email,
};
pub use postgres::PgAccountRepository;
pub use repository::{AccountRepository, InMemoryAccountRepository};
pub use service::AccountService;
