//! HTTP Handlers
//!
//! Every authentication or storage failure on these routes is converted to
//! a redirect; failure detail goes to the log, never to the client.

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use std::sync::Arc;

use platform::cookie::{CookieConfig, extract_cookie};
use platform::crypto::constant_time_eq;

use crate::application::config::AuthConfig;
use crate::application::{
    ExternalSignInUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
    SessionManager,
};
use crate::domain::entity::identity::Identity;
use crate::domain::repository::{
    CredentialRepository, IdentityRepository, ProviderLinkRepository, SessionRepository,
};
use crate::domain::value_object::provider::Provider;
use crate::infra::oauth::OAuthClient;
use crate::presentation::dto::{CallbackParams, LoginForm, RegisterForm};
use crate::presentation::views;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: IdentityRepository
        + CredentialRepository
        + ProviderLinkRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Public pages
// ============================================================================

/// GET /
pub async fn home() -> Html<String> {
    Html(views::home())
}

/// GET /register
pub async fn register_page() -> Html<String> {
    Html(views::register_page())
}

/// GET /login
pub async fn login_page() -> Html<String> {
    Html(views::login_page())
}

// ============================================================================
// Local registration
// ============================================================================

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Form(form): Form<RegisterForm>,
) -> Response
where
    R: IdentityRepository
        + CredentialRepository
        + ProviderLinkRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.repo.clone());

    let input = RegisterInput {
        username: form.username,
        password: form.password,
    };

    match use_case.execute(input).await {
        Ok(identity) => establish_and_redirect(&state, &identity).await,
        Err(e) => {
            // No error detail surfaced; back to the form
            e.log();
            Redirect::to("/register").into_response()
        }
    }
}

// ============================================================================
// Local login
// ============================================================================

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Form(form): Form<LoginForm>,
) -> Response
where
    R: IdentityRepository
        + CredentialRepository
        + ProviderLinkRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.repo.clone());

    let input = LoginInput {
        username: form.username,
        password: form.password,
    };

    match use_case.execute(input).await {
        Ok(identity) => establish_and_redirect(&state, &identity).await,
        Err(e) => {
            e.log();
            Redirect::to("/login").into_response()
        }
    }
}

// ============================================================================
// External sign-in (authorization-code grant)
// ============================================================================

/// GET /auth/{provider}
///
/// Redirect step: build the provider authorization URL, stash the CSRF
/// state in a short-lived cookie, send the user agent to the provider.
pub async fn oauth_start<R>(
    State(state): State<AuthAppState<R>>,
    Path(provider): Path<String>,
) -> Response
where
    R: IdentityRepository
        + CredentialRepository
        + ProviderLinkRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let Ok(provider) = provider.parse::<Provider>() else {
        return Redirect::to("/").into_response();
    };

    let Some(settings) = state.config.provider(provider) else {
        tracing::warn!(provider = %provider, "Provider not configured");
        return Redirect::to("/").into_response();
    };

    let client = OAuthClient::new(provider, settings.clone());

    match client.authorize_url() {
        Ok((url, csrf_state)) => (
            AppendHeaders([(
                header::SET_COOKIE,
                build_state_cookie(&state.config, &csrf_state),
            )]),
            Redirect::to(&url),
        )
            .into_response(),
        Err(e) => {
            e.log();
            Redirect::to("/").into_response()
        }
    }
}

/// GET /auth/{provider}/callback
///
/// Callback step: verify the CSRF state, exchange the code, normalize the
/// profile into an identity, establish a session. Every failure redirects
/// to the home page and creates no partial records.
pub async fn oauth_callback<R>(
    State(state): State<AuthAppState<R>>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> Response
where
    R: IdentityRepository
        + CredentialRepository
        + ProviderLinkRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let Ok(provider) = provider.parse::<Provider>() else {
        return callback_failure(&state.config);
    };

    if let Some(error) = &params.error {
        tracing::warn!(provider = %provider, error = %error, "Provider returned error");
        return callback_failure(&state.config);
    }

    let Some(code) = params.code else {
        tracing::warn!(provider = %provider, "Callback without authorization code");
        return callback_failure(&state.config);
    };

    // CSRF state must match the cookie set at the redirect step
    let expected_state = extract_cookie(&headers, &state.config.state_cookie_name);
    let state_ok = matches!(
        (&expected_state, &params.state),
        (Some(expected), Some(received))
            if constant_time_eq(expected.as_bytes(), received.as_bytes())
    );
    if !state_ok {
        tracing::warn!(provider = %provider, "OAuth state mismatch");
        return callback_failure(&state.config);
    }

    let Some(settings) = state.config.provider(provider) else {
        tracing::warn!(provider = %provider, "Provider not configured");
        return callback_failure(&state.config);
    };

    let client = OAuthClient::new(provider, settings.clone());

    let profile = match client.fetch_profile(code).await {
        Ok(profile) => profile,
        Err(e) => {
            e.log();
            return callback_failure(&state.config);
        }
    };

    let use_case = ExternalSignInUseCase::new(state.repo.clone());

    let identity = match use_case.execute(profile).await {
        Ok(identity) => identity,
        Err(e) => {
            e.log();
            return callback_failure(&state.config);
        }
    };

    let manager = SessionManager::new(state.repo.clone(), state.config.clone());

    match manager.establish(&identity).await {
        Ok((_, token)) => (
            AppendHeaders([
                (
                    header::SET_COOKIE,
                    build_session_cookie(&state.config, &token),
                ),
                (header::SET_COOKIE, clear_state_cookie(&state.config)),
            ]),
            Redirect::to("/secrets"),
        )
            .into_response(),
        Err(e) => {
            e.log();
            callback_failure(&state.config)
        }
    }
}

// ============================================================================
// Logout
// ============================================================================

/// GET /logout
///
/// Destroys the session (idempotent) and clears the cookie.
pub async fn logout<R>(State(state): State<AuthAppState<R>>, headers: HeaderMap) -> Response
where
    R: IdentityRepository
        + CredentialRepository
        + ProviderLinkRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    if let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) {
        let manager = SessionManager::new(state.repo.clone(), state.config.clone());
        // Ignore errors - just clear the cookie
        if let Err(e) = manager.destroy(&token).await {
            e.log();
        }
    }

    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie(&state.config))]),
        Redirect::to("/"),
    )
        .into_response()
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn establish_and_redirect<R>(state: &AuthAppState<R>, identity: &Identity) -> Response
where
    R: IdentityRepository
        + CredentialRepository
        + ProviderLinkRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let manager = SessionManager::new(state.repo.clone(), state.config.clone());

    match manager.establish(identity).await {
        Ok((_, token)) => (
            AppendHeaders([(
                header::SET_COOKIE,
                build_session_cookie(&state.config, &token),
            )]),
            Redirect::to("/secrets"),
        )
            .into_response(),
        Err(e) => {
            e.log();
            Redirect::to("/login").into_response()
        }
    }
}

fn callback_failure(config: &AuthConfig) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, clear_state_cookie(config))]),
        Redirect::to("/"),
    )
        .into_response()
}

fn session_cookie_config(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl_secs()),
    }
}

fn state_cookie_config(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.state_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.state_ttl.as_secs() as i64),
    }
}

fn build_session_cookie(config: &AuthConfig, token: &str) -> String {
    session_cookie_config(config).build_set_cookie(token)
}

fn clear_session_cookie(config: &AuthConfig) -> String {
    session_cookie_config(config).build_delete_cookie()
}

fn build_state_cookie(config: &AuthConfig, value: &str) -> String {
    state_cookie_config(config).build_set_cookie(value)
}

fn clear_state_cookie(config: &AuthConfig) -> String {
    state_cookie_config(config).build_delete_cookie()
}
