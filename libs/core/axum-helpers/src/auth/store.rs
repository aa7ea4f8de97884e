//! Revocation list for signed-out tokens.
//!
//! A revoked `jti` only needs to be remembered until the token would have
//! expired anyway, so both stores keep entries with a TTL.

use super::error::AuthResult;
use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Remember `jti` as revoked for `ttl_secs` seconds.
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> AuthResult<()>;

    async fn is_revoked(&self, jti: &str) -> AuthResult<bool>;

    /// Round-trip check used by `/ready`.
    async fn ping(&self) -> AuthResult<()>;
}

/// Redis-backed revocation list (`jwt:blacklist:{jti}` keys with `SETEX`).
#[derive(Clone)]
pub struct RedisTokenStore {
    client: ConnectionManager,
}

impl RedisTokenStore {
    pub fn new(manager: ConnectionManager) -> Self {
        tracing::info!("Redis token store initialized");
        Self { client: manager }
    }

    fn key(jti: &str) -> String {
        format!("jwt:blacklist:{}", jti)
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> AuthResult<()> {
        let mut conn = self.client.clone();
        conn.set_ex::<_, _, ()>(Self::key(jti), "1", ttl_secs.max(1))
            .await?;
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> AuthResult<bool> {
        let mut conn = self.client.clone();
        let exists: bool = conn.exists(Self::key(jti)).await?;
        Ok(exists)
    }

    async fn ping(&self) -> AuthResult<()> {
        let mut conn = self.client.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

/// Process-local revocation list for tests and Redis-less development.
///
/// Entries vanish on restart, so a signed-out token becomes usable again
/// until it expires. Run with `REDIS_URL` set when that matters.
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    revoked: Arc<RwLock<HashMap<String, Instant>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> AuthResult<()> {
        let now = Instant::now();
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, expires| *expires > now);
        revoked.insert(jti.to_string(), now + Duration::from_secs(ttl_secs.max(1)));
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> AuthResult<bool> {
        let revoked = self.revoked.read().await;
        Ok(revoked
            .get(jti)
            .is_some_and(|expires| *expires > Instant::now()))
    }

    async fn ping(&self) -> AuthResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_revoke_is_idempotent() {
        let store = InMemoryTokenStore::new();
        assert!(!store.is_revoked("abc").await.unwrap());

        store.revoke("abc", 60).await.unwrap();
        store.revoke("abc", 60).await.unwrap();

        assert!(store.is_revoked("abc").await.unwrap());
        assert!(!store.is_revoked("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_in_memory_entries_expire() {
        let store = InMemoryTokenStore::new();
        store
            .revoked
            .write()
            .await
            .insert("old".to_string(), Instant::now() - Duration::from_secs(1));

        assert!(!store.is_revoked("old").await.unwrap());

        // Pruned on the next write
        store.revoke("new", 60).await.unwrap();
        assert!(!store.revoked.read().await.contains_key("old"));
    }
}
