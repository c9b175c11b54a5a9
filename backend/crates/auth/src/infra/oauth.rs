//! OAuth Provider Adapter
//!
//! Client role of the authorization-code grant. One instance per
//! configured provider; the adapter's only job is to turn a callback code
//! into a normalized [`ProviderProfile`]. Provider wire details stay here.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope,
    TokenResponse, TokenUrl,
};
use serde::Deserialize;

use crate::application::config::ProviderSettings;
use crate::application::external_sign_in::ProviderProfile;
use crate::domain::value_object::provider::Provider;
use crate::error::{AuthError, AuthResult};

/// OAuth client for one configured provider
pub struct OAuthClient {
    provider: Provider,
    settings: ProviderSettings,
    http: reqwest::Client,
}

/// Userinfo payload. Google names the subject `sub` (OIDC), Facebook `id`.
#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: Option<String>,
    id: Option<String>,
    email: Option<String>,
}

impl OAuthClient {
    pub fn new(provider: Provider, settings: ProviderSettings) -> Self {
        Self {
            provider,
            settings,
            http: reqwest::Client::new(),
        }
    }

    /// Build the authorization URL for the redirect step
    ///
    /// Returns the URL and the CSRF state secret to be stored in a
    /// short-lived cookie and checked at the callback. Touches no
    /// persistent state.
    pub fn authorize_url(&self) -> AuthResult<(String, String)> {
        let client = self.basic_client()?;

        let mut request = client.authorize_url(CsrfToken::new_random);
        for scope in &self.settings.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }

        let (url, csrf_token) = request.url();
        Ok((url.to_string(), csrf_token.secret().clone()))
    }

    /// Callback step: exchange the code and fetch the provider profile
    pub async fn fetch_profile(&self, code: String) -> AuthResult<ProviderProfile> {
        let client = self.basic_client()?;

        let token = client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(oauth2::reqwest::async_http_client)
            .await
            .map_err(|e| AuthError::ExternalAuthFailure(format!("code exchange failed: {e}")))?;

        let userinfo: UserInfo = self
            .http
            .get(&self.settings.userinfo_url)
            .bearer_auth(token.access_token().secret())
            .send()
            .await
            .map_err(|e| AuthError::ExternalAuthFailure(format!("profile fetch failed: {e}")))?
            .error_for_status()
            .map_err(|e| AuthError::ExternalAuthFailure(format!("profile fetch failed: {e}")))?
            .json()
            .await
            .map_err(|e| AuthError::ExternalAuthFailure(format!("profile parse failed: {e}")))?;

        let subject = userinfo
            .sub
            .or(userinfo.id)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AuthError::ExternalAuthFailure("profile has no subject id".to_string())
            })?;

        Ok(ProviderProfile {
            provider: self.provider,
            subject,
            email: userinfo.email,
        })
    }

    fn basic_client(&self) -> AuthResult<BasicClient> {
        let auth_url = AuthUrl::new(self.settings.auth_url.clone())
            .map_err(|e| AuthError::ExternalAuthFailure(format!("bad authorization URL: {e}")))?;
        let token_url = TokenUrl::new(self.settings.token_url.clone())
            .map_err(|e| AuthError::ExternalAuthFailure(format!("bad token URL: {e}")))?;
        let redirect_url = RedirectUrl::new(self.settings.redirect_url.clone())
            .map_err(|e| AuthError::ExternalAuthFailure(format!("bad redirect URL: {e}")))?;

        Ok(BasicClient::new(
            ClientId::new(self.settings.client_id.clone()),
            Some(ClientSecret::new(self.settings.client_secret.clone())),
            auth_url,
            Some(token_url),
        )
        .set_redirect_uri(redirect_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google_client() -> OAuthClient {
        OAuthClient::new(
            Provider::Google,
            ProviderSettings::google(
                "client-id-123".to_string(),
                "client-secret".to_string(),
                "http://localhost:3000",
            ),
        )
    }

    #[test]
    fn test_authorize_url_shape() {
        let (url, state) = google_client().authorize_url().unwrap();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
        assert!(url.contains("client_id=client-id-123"));
        assert!(url.contains("scope=email"));
        assert!(url.contains(&format!("state={state}")));
        assert!(url.contains("response_type=code"));
        // Callback URL is fixed and percent-encoded
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fgoogle%2Fcallback"));
    }

    #[test]
    fn test_state_is_random() {
        let client = google_client();
        let (_, a) = client.authorize_url().unwrap();
        let (_, b) = client.authorize_url().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_userinfo_prefers_oidc_subject() {
        let oidc: UserInfo =
            serde_json::from_str(r#"{"sub":"abc123","email":"a@example.com"}"#).unwrap();
        assert_eq!(oidc.sub.as_deref(), Some("abc123"));

        let graph: UserInfo = serde_json::from_str(r#"{"id":"98765"}"#).unwrap();
        assert_eq!(graph.id.as_deref(), Some("98765"));
        assert!(graph.email.is_none());
    }

    #[test]
    fn test_bad_endpoint_url_is_external_failure() {
        let client = OAuthClient::new(
            Provider::Facebook,
            ProviderSettings {
                client_id: "x".into(),
                client_secret: "y".into(),
                auth_url: "not a url".into(),
                token_url: "also not".into(),
                userinfo_url: String::new(),
                redirect_url: String::new(),
                scopes: vec![],
            },
        );

        assert!(matches!(
            client.authorize_url(),
            Err(AuthError::ExternalAuthFailure(_))
        ));
    }
}
