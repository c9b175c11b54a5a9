//! Auth Router

use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{
    CredentialRepository, IdentityRepository, ProviderLinkRepository, SessionRepository,
};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
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
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register::<R>),
        )
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login::<R>),
        )
        .route("/auth/{provider}", get(handlers::oauth_start::<R>))
        .route(
            "/auth/{provider}/callback",
            get(handlers::oauth_callback::<R>),
        )
        .route("/logout", get(handlers::logout::<R>))
        .with_state(state)
}
