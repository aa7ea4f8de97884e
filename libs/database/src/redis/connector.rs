use super::config::RedisConfig;
use super::health::check_health;
use crate::common::{DatabaseResult, RetryConfig, retry_with_backoff};
use redis::aio::ConnectionManager;
use tracing::info;

/// Open a `ConnectionManager` and PING once so a bad URL fails at start-up.
pub async fn connect(url: &str) -> DatabaseResult<ConnectionManager> {
    let client = redis::Client::open(url)?;
    let mut manager = ConnectionManager::new(client).await?;
    check_health(&mut manager).await?;

    info!("Connected to Redis");
    Ok(manager)
}

/// Connect, retrying with exponential backoff. `None` uses [`RetryConfig::default`].
pub async fn connect_from_config_with_retry(
    config: RedisConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<ConnectionManager> {
    retry_with_backoff(|| connect(&config.url), retry_config.unwrap_or_default()).await
}
