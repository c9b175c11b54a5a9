//! Secrets Router
//!
//! The returned router carries no authorization itself; the composing
//! application layers `auth::middleware::require_identity` over it.

use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;

use crate::domain::repository::SecretRepository;
use crate::infra::postgres::PgSecretRepository;
use crate::presentation::handlers::{self, SecretsAppState};

/// Create the Secrets router with PostgreSQL repository
pub fn secrets_router(repo: PgSecretRepository) -> Router {
    secrets_router_generic(repo)
}

/// Create a generic Secrets router for any repository implementation
pub fn secrets_router_generic<R>(repo: R) -> Router
where
    R: SecretRepository + Clone + Send + Sync + 'static,
{
    let state = SecretsAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/secrets", get(handlers::list_all::<R>))
        .route("/mysecret", get(handlers::my_secrets::<R>))
        .route(
            "/submit",
            get(handlers::submit_page).post(handlers::submit::<R>),
        )
        .with_state(state)
}
