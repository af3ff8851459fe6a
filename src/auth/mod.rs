//! Login gate.
//!
//! Checks a username/password pair against the configured defaults and the
//! shape of the provider key the user brings. A successful login hands back
//! the key as a [`ProviderKey`], which only lives as long as the session
//! built from it.

use crate::utilities::config::AppConfig;
use crate::utilities::errors::AuthError;

/// Required prefix of a Groq API key.
pub const API_KEY_PREFIX: &str = "gsk_";

/// Minimum length of a Groq API key.
pub const API_KEY_MIN_LEN: usize = 40;

/// A provider key that passed format validation.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderKey(String);

impl ProviderKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ProviderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProviderKey(<redacted>)")
    }
}

/// Check the provider key format: prefix `gsk_` and at least 40 characters,
/// ignoring surrounding whitespace.
pub fn validate_api_key(api_key: &str) -> Result<ProviderKey, AuthError> {
    let key = api_key.trim();
    if !key.starts_with(API_KEY_PREFIX) || key.chars().count() < API_KEY_MIN_LEN {
        return Err(AuthError::InvalidApiKey {
            prefix: API_KEY_PREFIX,
            min_len: API_KEY_MIN_LEN,
        });
    }
    Ok(ProviderKey(key.to_string()))
}

/// Credential check against a single configured account.
#[derive(Clone)]
pub struct AuthGate {
    username: Option<String>,
    password: Option<String>,
}

impl AuthGate {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }

    /// Whether both credentials are configured.
    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Validate a login attempt.
    ///
    /// Checks run in order: gate configured, key format, credentials.
    pub fn login(
        &self,
        username: &str,
        password: &str,
        api_key: &str,
    ) -> Result<ProviderKey, AuthError> {
        let (Some(expected_user), Some(expected_pass)) = (&self.username, &self.password) else {
            log::warn!("Login rejected: credentials are not configured");
            return Err(AuthError::NotConfigured);
        };

        let key = validate_api_key(api_key)?;

        if username != expected_user || password != expected_pass {
            log::warn!("Login rejected for user '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }

        log::info!("User '{}' logged in", username);
        Ok(key)
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_key() -> String {
        format!("gsk_{}", "a".repeat(40))
    }

    fn gate() -> AuthGate {
        AuthGate::new(Some("admin".into()), Some("hunter2".into()))
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key(&valid_key()).is_ok());
        assert_eq!(
            validate_api_key(&format!("  {}  ", valid_key())).unwrap().as_str(),
            valid_key()
        );
        assert!(validate_api_key("gsk_short").is_err());
        assert!(validate_api_key(&format!("sk_{}", "a".repeat(40))).is_err());
        assert!(validate_api_key("").is_err());
    }

    #[test]
    fn test_key_exactly_min_len() {
        let key = format!("gsk_{}", "b".repeat(API_KEY_MIN_LEN - 4));
        assert!(validate_api_key(&key).is_ok());
        assert!(validate_api_key(&key[..key.len() - 1]).is_err());
    }

    #[test]
    fn test_login_success() {
        let key = gate().login("admin", "hunter2", &valid_key()).unwrap();
        assert_eq!(key.as_str(), valid_key());
    }

    #[test]
    fn test_login_wrong_password() {
        assert_eq!(
            gate().login("admin", "nope", &valid_key()),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_key_checked_before_credentials() {
        assert!(matches!(
            gate().login("admin", "nope", "bad"),
            Err(AuthError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn test_unconfigured_gate_rejects_everything() {
        let gate = AuthGate::new(Some("admin".into()), None);
        assert!(!gate.is_configured());
        assert_eq!(
            gate.login("admin", "", &valid_key()),
            Err(AuthError::NotConfigured)
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let key = validate_api_key(&valid_key()).unwrap();
        assert!(!format!("{:?}", key).contains("gsk_"));
        assert!(!format!("{:?}", gate()).contains("hunter2"));
    }
}
