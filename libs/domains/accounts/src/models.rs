use axum_helpers::IssuedToken;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Account role; `admin` unlocks marking items retrieved
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Account entity - matches SQL schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Stored trimmed and lowercased
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Role names as they appear in session claims
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(Role::to_string).collect()
    }
}

/// An account ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<Role>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            roles: account.roles,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[validate(email)]
    #[schema(example = "student@campus.edu")]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    #[schema(example = "correct horse battery")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(email)]
    #[schema(example = "student@campus.edu")]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Body returned by sign-up and sign-in. The token is also set as a cookie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub account: AccountResponse,
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}

/// A signed-in account and its freshly issued token
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
    pub token: IssuedToken,
}

impl Session {
    pub fn expires_in(&self) -> u64 {
        self.token.claims.remaining_ttl()
    }

    pub fn into_response(self) -> SessionResponse {
        let expires_in = self.expires_in();
        SessionResponse {
            account: self.account.into(),
            access_token: self.token.token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Emails compare case-insensitively and ignore surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
