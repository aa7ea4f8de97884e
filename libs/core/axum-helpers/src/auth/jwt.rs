use super::config::JwtConfig;
use super::error::{AuthError, AuthResult};
use super::store::TokenStore;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Role name that unlocks administrative actions.
pub const ADMIN_ROLE: &str = "admin";

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,        // Account id
    pub email: String,      // Account email, also the item owner key
    pub name: String,       // Display name
    pub roles: Vec<String>, // Account roles
    pub exp: i64,           // Expiration time
    pub iat: i64,           // Issued at
    pub jti: String,        // Token id, used for revocation
}

impl JwtClaims {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }

    /// Seconds until `exp`, never negative.
    pub fn remaining_ttl(&self) -> u64 {
        (self.exp - Utc::now().timestamp()).max(0) as u64
    }
}

/// A freshly signed token together with the claims inside it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: JwtClaims,
}

/// Stateless HS256 tokens plus a revocation list.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
    store: Arc<dyn TokenStore>,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig, store: Arc<dyn TokenStore>) -> Self {
        tracing::info!(ttl_secs = config.ttl_secs, "JWT auth initialized");
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl_secs: config.ttl_secs,
            store,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Sign a session token for an account.
    pub fn issue(&self, account_id: &str, email: &str, roles: &[String]) -> AuthResult<IssuedToken> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: account_id.to_string(),
            email: email.to_string(),
            name: display_name(email),
            roles: roles.to_vec(),
            exp: (now + Duration::seconds(self.ttl_secs as i64)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Issue(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Check signature and expiry only.
    pub fn verify(&self, token: &str) -> AuthResult<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Verify and reject revoked tokens.
    pub async fn authenticate(&self, token: &str) -> AuthResult<JwtClaims> {
        let claims = self.verify(token)?;

        if self.store.is_revoked(&claims.jti).await? {
            return Err(AuthError::Revoked);
        }

        Ok(claims)
    }

    /// Put the token on the revocation list until it would have expired.
    pub async fn revoke(&self, claims: &JwtClaims) -> AuthResult<()> {
        let ttl = claims.remaining_ttl();
        if ttl == 0 {
            return Ok(());
        }
        self.store.revoke(&claims.jti, ttl).await
    }
}

fn display_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
