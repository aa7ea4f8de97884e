#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_required};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedisConfig {
    /// Full connection URL, e.g. `redis://:secret@127.0.0.1:6379/0`
    pub url: String,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// `Some` when `REDIS_URL` is set and non-blank.
    #[cfg(feature = "config")]
    pub fn optional_from_env() -> Option<Self> {
        std::env::var("REDIS_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(Self::new)
    }
}

#[cfg(feature = "config")]
impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        env_required("REDIS_URL").map(Self::new)
    }
}
