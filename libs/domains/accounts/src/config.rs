use core_config::{ConfigError, Environment, FromEnv, env_list};

/// Settings for the auth provider
#[derive(Clone, Debug, Default)]
pub struct AccountsConfig {
    /// Emails that receive the admin role at sign-up, lowercased
    pub admin_emails: Vec<String>,
    /// Add `Secure` to the session cookie
    pub secure_cookies: bool,
}

impl AccountsConfig {
    pub fn new<I, S>(admin_emails: I, secure_cookies: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            admin_emails: admin_emails
                .into_iter()
                .map(|email| crate::models::normalize_email(email.as_ref()))
                .filter(|email| !email.is_empty())
                .collect(),
            secure_cookies,
        }
    }

    /// `email` must already be normalized
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|admin| admin == email)
    }
}

impl FromEnv for AccountsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        Ok(Self::new(env_list("ADMIN_EMAILS"), environment.use_https()))
    }
}
