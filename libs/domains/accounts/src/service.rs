use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::{AuthError, JwtAuth, JwtClaims};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::config::AccountsConfig;
use crate::error::{AccountError, AccountResult};
use crate::models::{Account, NewAccount, Role, Session, SignInRequest, SignUpRequest, normalize_email};
use crate::repository::AccountRepository;

/// Sign-up, sign-in, sign-out and the current-user lookup
#[derive(Clone)]
pub struct AccountService<R: AccountRepository> {
    repository: Arc<R>,
    auth: JwtAuth,
    config: AccountsConfig,
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repository: R, auth: JwtAuth, config: AccountsConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            auth,
            config,
        }
    }

    pub fn auth(&self) -> &JwtAuth {
        &self.auth
    }

    pub fn config(&self) -> &AccountsConfig {
        &self.config
    }

    /// Create an account and start a session for it.
    ///
    /// Accounts whose email is listed in `ADMIN_EMAILS` also get the admin role.
    #[instrument(skip(self, input))]
    pub async fn sign_up(&self, input: SignUpRequest) -> AccountResult<Session> {
        input.validate()?;

        let email = normalize_email(&input.email);
        let mut roles = vec![Role::User];
        if self.config.is_admin_email(&email) {
            roles.push(Role::Admin);
        }

        let password_hash = hash_password(&input.password)?;
        let account = self
            .repository
            .create(NewAccount {
                email,
                password_hash,
                roles,
            })
            .await?;

        tracing::info!(account_id = %account.id, admin = account.is_admin(), "Account created");
        self.start_session(account)
    }

    /// Check credentials and start a session.
    ///
    /// An unknown email and a wrong password fail the same way.
    #[instrument(skip(self, input))]
    pub async fn sign_in(&self, input: SignInRequest) -> AccountResult<Session> {
        input.validate()?;

        let email = normalize_email(&input.email);
        let account = self
            .repository
            .get_by_email(&email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !verify_password(&input.password, &account.password_hash)? {
            tracing::debug!(account_id = %account.id, "Password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        self.start_session(account)
    }

    /// Revoke a session token until it would have expired.
    ///
    /// Tokens that are already expired or unreadable have nothing left to
    /// revoke, so signing out with them succeeds too.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, token: &str) -> AccountResult<Option<JwtClaims>> {
        let claims = match self.auth.verify(token) {
            Ok(claims) => claims,
            Err(AuthError::InvalidToken(reason)) => {
                tracing::debug!(%reason, "Sign-out with unusable token");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        self.auth.revoke(&claims).await?;
        tracing::info!(account_id = %claims.sub, "Session revoked");
        Ok(Some(claims))
    }

    /// The account behind a verified session
    #[instrument(skip_all, fields(account_id = %claims.sub))]
    pub async fn current_user(&self, claims: &JwtClaims) -> AccountResult<Account> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|e| AuthError::InvalidToken(format!("bad subject: {}", e)))?;

        self.repository
            .get_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    fn start_session(&self, account: Account) -> AccountResult<Session> {
        let token = self
            .auth
            .issue(&account.id.to_string(), &account.email, &account.role_names())?;
        Ok(Session { account, token })
    }
}

fn hash_password(password: &str) -> AccountResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> AccountResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AccountError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryAccountRepository, MockAccountRepository};
    use axum_helpers::{InMemoryTokenStore, JwtConfig};
    use chrono::Utc;
    use mockall::predicate::eq;

    fn jwt() -> JwtAuth {
        let config = JwtConfig::new("test-secret-key-for-unit-tests-only-32c", 900).unwrap();
        JwtAuth::new(&config, Arc::new(InMemoryTokenStore::new()))
    }

    fn service() -> AccountService<InMemoryAccountRepository> {
        AccountService::new(
            InMemoryAccountRepository::new(),
            jwt(),
            AccountsConfig::new(["desk@campus.edu"], false),
        )
    }

    fn sign_up(email: &str, password: &str) -> SignUpRequest {
        SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn sign_in(email: &str, password: &str) -> SignInRequest {
        SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let err = verify_password("anything", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AccountError::PasswordHash(_)));
    }

    #[tokio::test]
    async fn test_sign_up_normalizes_email_and_issues_token() {
        let service = service();
        let session = service
            .sign_up(sign_up("  Student@Campus.EDU ", "long enough"))
            .await
            .unwrap();

        assert_eq!(session.account.email, "student@campus.edu");
        assert_eq!(session.account.roles, vec![Role::User]);
        assert_ne!(session.account.password_hash, "long enough");

        let claims = service.auth().authenticate(&session.token.token).await.unwrap();
        assert_eq!(claims.sub, session.account.id.to_string());
        assert_eq!(claims.email, "student@campus.edu");
        assert!(!claims.is_admin());
    }

    #[tokio::test]
    async fn test_listed_email_gets_admin_role() {
        let session = service()
            .sign_up(sign_up("DESK@campus.edu", "long enough"))
            .await
            .unwrap();

        assert!(session.account.is_admin());
        assert!(session.token.claims.is_admin());
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_ignores_case() {
        let service = service();
        service
            .sign_up(sign_up("a@campus.edu", "long enough"))
            .await
            .unwrap();

        let err = service
            .sign_up(sign_up("A@Campus.edu", "another one"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_short_password_is_rejected_before_storage() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create().never();

        let service = AccountService::new(repo, jwt(), AccountsConfig::default());
        let err = service.sign_up(sign_up("a@campus.edu", "short")).await.unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
    }

    #[tokio::test]
    async fn test_sign_in_failures_are_indistinguishable() {
        let service = service();
        service
            .sign_up(sign_up("a@campus.edu", "long enough"))
            .await
            .unwrap();

        let wrong_password = service
            .sign_in(sign_in("a@campus.edu", "not the one"))
            .await
            .unwrap_err();
        let unknown_email = service
            .sign_in(sign_in("b@campus.edu", "long enough"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AccountError::InvalidCredentials));
        assert!(matches!(unknown_email, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_sign_in_matches_email_case_insensitively() {
        let service = service();
        let created = service
            .sign_up(sign_up("a@campus.edu", "long enough"))
            .await
            .unwrap();

        let session = service
            .sign_in(sign_in(" A@CAMPUS.edu", "long enough"))
            .await
            .unwrap();
        assert_eq!(session.account.id, created.account.id);
        assert_ne!(session.token.claims.jti, created.token.claims.jti);
    }

    #[tokio::test]
    async fn test_sign_out_revokes_and_is_idempotent() {
        let service = service();
        let session = service
            .sign_up(sign_up("a@campus.edu", "long enough"))
            .await
            .unwrap();
        let token = session.token.token;

        let revoked = service.sign_out(&token).await.unwrap();
        assert_eq!(revoked.unwrap().jti, session.token.claims.jti);

        let err = service.auth().authenticate(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Revoked));

        assert!(service.sign_out(&token).await.unwrap().is_some());
        assert!(service.sign_out("garbage").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_current_user_reads_the_subject() {
        let service = service();
        let session = service
            .sign_up(sign_up("a@campus.edu", "long enough"))
            .await
            .unwrap();

        let account = service.current_user(&session.token.claims).await.unwrap();
        assert_eq!(account.id, session.account.id);
    }

    #[tokio::test]
    async fn test_current_user_for_deleted_account() {
        let id = Uuid::now_v7();
        let mut repo = MockAccountRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(None));

        let service = AccountService::new(repo, jwt(), AccountsConfig::default());
        let claims = service
            .auth()
            .issue(&id.to_string(), "gone@campus.edu", &["user".to_string()])
            .unwrap()
            .claims;

        let err = service.current_user(&claims).await.unwrap_err();
        assert!(matches!(err, AccountError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_current_user_rejects_non_uuid_subject() {
        let service = AccountService::new(
            MockAccountRepository::new(),
            jwt(),
            AccountsConfig::default(),
        );
        let claims = JwtClaims {
            sub: "not-a-uuid".into(),
            email: "a@campus.edu".into(),
            name: "a".into(),
            roles: vec![],
            exp: Utc::now().timestamp() + 60,
            iat: Utc::now().timestamp(),
            jti: "jti".into(),
        };

        let err = service.current_user(&claims).await.unwrap_err();
        assert!(matches!(err, AccountError::Auth(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_on_sign_in() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_by_email()
            .with(eq("a@campus.edu"))
            .returning(|_| Err(AccountError::Database("connection reset".into())));

        let service = AccountService::new(repo, jwt(), AccountsConfig::default());
        let err = service
            .sign_in(sign_in("a@campus.edu", "long enough"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Database(msg) if msg == "connection reset"));
    }
}
