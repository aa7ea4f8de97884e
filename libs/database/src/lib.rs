//! Connectors for PostgreSQL (SeaORM) and Redis.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL support with SeaORM, migrations
//! - `redis` (default) - Redis `ConnectionManager`
//! - `config` - `core_config::FromEnv` for the config structs
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<migration::Migrator>(&db, "lostfound_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "redis")]
pub mod redis;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
