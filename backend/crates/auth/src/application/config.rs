//! Application Configuration
//!
//! Configuration for the Auth application layer: session cookie/signing
//! parameters and the external provider table. Built once at startup and
//! dependency-injected into routers; nothing here is ambient global state.

use std::collections::HashMap;
use std::time::Duration;

use crate::domain::value_object::provider::Provider;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Settings for one external OAuth provider
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub client_id: String,
    pub client_secret: String,
    /// Provider authorization endpoint
    pub auth_url: String,
    /// Provider token endpoint
    pub token_url: String,
    /// Profile endpoint queried with the access token
    pub userinfo_url: String,
    /// Fixed callback URL registered with the provider
    pub redirect_url: String,
    /// Requested scopes
    pub scopes: Vec<String>,
}

impl ProviderSettings {
    /// Google with its standard endpoints; `base_url` is this app's public
    /// origin (e.g. `http://localhost:3000`).
    pub fn google(client_id: String, client_secret: String, base_url: &str) -> Self {
        Self {
            client_id,
            client_secret,
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://www.googleapis.com/oauth2/v3/userinfo".to_string(),
            redirect_url: format!("{base_url}/auth/google/callback"),
            scopes: vec!["email".to_string()],
        }
    }

    /// Facebook with its standard endpoints.
    pub fn facebook(client_id: String, client_secret: String, base_url: &str) -> Self {
        Self {
            client_id,
            client_secret,
            auth_url: "https://www.facebook.com/v19.0/dialog/oauth".to_string(),
            token_url: "https://graph.facebook.com/v19.0/oauth/access_token".to_string(),
            userinfo_url: "https://graph.facebook.com/me?fields=id,email".to_string(),
            redirect_url: format!("{base_url}/auth/facebook/callback"),
            scopes: vec!["email".to_string()],
        }
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session TTL (default 7 days)
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// OAuth CSRF state cookie name
    pub state_cookie_name: String,
    /// OAuth CSRF state cookie TTL
    pub state_ttl: Duration,
    /// Configured external providers
    pub providers: HashMap<Provider, ProviderSettings>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "session".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            state_cookie_name: "oauth_state".to_string(),
            state_ttl: Duration::from_secs(600), // 10 minutes
            providers: HashMap::new(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Register an external provider
    pub fn with_provider(mut self, provider: Provider, settings: ProviderSettings) -> Self {
        self.providers.insert(provider, settings);
        self
    }

    /// Look up a configured provider
    pub fn provider(&self, provider: Provider) -> Option<&ProviderSettings> {
        self.providers.get(&provider)
    }

    /// Get session TTL in seconds (for cookie Max-Age)
    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl.as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_providers() {
        let config = AuthConfig::default();
        assert!(config.provider(Provider::Google).is_none());
        assert!(config.provider(Provider::Facebook).is_none());
    }

    #[test]
    fn test_with_provider() {
        let config = AuthConfig::development().with_provider(
            Provider::Google,
            ProviderSettings::google("id".into(), "secret".into(), "http://localhost:3000"),
        );

        let settings = config.provider(Provider::Google).unwrap();
        assert_eq!(
            settings.redirect_url,
            "http://localhost:3000/auth/google/callback"
        );
        assert_eq!(settings.scopes, vec!["email".to_string()]);
    }

    #[test]
    fn test_random_secret_differs() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_ne!(a.session_secret, b.session_secret);
    }
}
