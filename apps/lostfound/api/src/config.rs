use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use domain_accounts::AccountsConfig;
use domain_items::ImageStoreConfig;

// Import database configs from the database library
use database::postgres::PostgresConfig;
use database::redis::RedisConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    /// Without Redis, revoked tokens are kept in process memory
    pub redis: Option<RedisConfig>,
    pub server: ServerConfig,
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub images: ImageStoreConfig,
    pub accounts: AccountsConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let jwt = JwtConfig::from_env()?; // Required - JWT_SECRET, at least 32 chars

        Ok(Self {
            app: app_info!(),
            database,
            redis: RedisConfig::optional_from_env(),
            server,
            environment,
            jwt,
            images: ImageStoreConfig::from_env()?,
            accounts: AccountsConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "config-test-secret-with-at-least-32-chars";

    #[test]
    fn test_minimal_environment() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/lostfound")),
                ("JWT_SECRET", Some(SECRET)),
                ("REDIS_URL", None),
                ("ADMIN_EMAILS", Some("desk@campus.edu")),
                ("IMAGE_MAX_BYTES", None),
                ("APP_ENV", None),
                ("PORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.redis.is_none());
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.environment, Environment::Development);
                assert_eq!(config.accounts.admin_emails, vec!["desk@campus.edu"]);
                assert_eq!(config.images.public_base_url, "/images");
                assert_eq!(config.app.name, "lostfound_api");
            },
        );
    }

    #[test]
    fn test_redis_is_picked_up_when_set() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/lostfound")),
                ("JWT_SECRET", Some(SECRET)),
                ("REDIS_URL", Some("redis://127.0.0.1:6379")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.redis, Some(RedisConfig::new("redis://127.0.0.1:6379")));
            },
        );
    }

    #[test]
    fn test_missing_secret_fails() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/lostfound")),
                ("JWT_SECRET", None),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
