//! JWT settings loaded through `core_config::FromEnv`.

use core_config::{ConfigError, FromEnv, env_parse_or, env_required};

/// Default session lifetime: 15 minutes.
pub const ACCESS_TOKEN_TTL: u64 = 900;

const MIN_SECRET_LEN: usize = 32;

/// JWT authentication configuration.
///
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_TTL_SECS` (default 900)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Result<Self, ConfigError> {
        let secret = secret.into();

        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least {} characters (got {}). Generate one with: openssl rand -base64 32",
                    MIN_SECRET_LEN,
                    secret.len()
                ),
            });
        }

        if ttl_secs == 0 {
            return Err(ConfigError::ParseError {
                key: "JWT_TTL_SECS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self { secret, ttl_secs })
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        let ttl_secs = env_parse_or("JWT_TTL_SECS", ACCESS_TOKEN_TTL)?;

        Self::new(secret, ttl_secs)
    }
}
