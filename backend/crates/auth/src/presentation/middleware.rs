//! Auth Middleware
//!
//! Authorization gate for protected routes. This is a soft gate: an
//! anonymous caller is redirected to the login page, never answered with
//! 401/403.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::SessionManager;
use crate::domain::repository::SessionRepository;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Middleware that requires a resolved identity
///
/// On success the [`CurrentIdentity`](crate::CurrentIdentity) is inserted
/// into request extensions for downstream handlers; otherwise the caller
/// is redirected to `/login` and the inner service never runs.
pub async fn require_identity<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let manager = SessionManager::new(state.repo.clone(), state.config.clone());

    let current = match token {
        Some(token) => manager.resolve(&token).await,
        None => None,
    };

    match current {
        Some(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        None => Redirect::to("/login").into_response(),
    }
}
