//! HTTP Handlers
//!
//! Every route here is mounted behind the auth crate's `require_identity`
//! middleware; anonymous callers never reach these handlers. Storage
//! failures are converted to redirects, detail goes to the log only.

use axum::Extension;
use axum::Form;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use std::sync::Arc;

use auth::CurrentIdentity;

use crate::application::{ListSecretsUseCase, SubmitSecretInput, SubmitSecretUseCase};
use crate::domain::repository::SecretRepository;
use crate::presentation::dto::SubmitForm;
use crate::presentation::views;

/// Shared state for secrets handlers
#[derive(Clone)]
pub struct SecretsAppState<R>
where
    R: SecretRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

/// GET /secrets
///
/// Every posted secret, regardless of owner.
pub async fn list_all<R>(
    State(state): State<SecretsAppState<R>>,
    Extension(_identity): Extension<CurrentIdentity>,
) -> Response
where
    R: SecretRepository + Clone + Send + Sync + 'static,
{
    let use_case = ListSecretsUseCase::new(state.repo.clone());

    match use_case.all().await {
        Ok(secrets) => Html(views::secrets_page(&secrets)).into_response(),
        Err(e) => {
            e.log();
            Redirect::to("/").into_response()
        }
    }
}

/// GET /mysecret
///
/// Only the caller's secrets.
pub async fn my_secrets<R>(
    State(state): State<SecretsAppState<R>>,
    Extension(identity): Extension<CurrentIdentity>,
) -> Response
where
    R: SecretRepository + Clone + Send + Sync + 'static,
{
    let use_case = ListSecretsUseCase::new(state.repo.clone());

    match use_case.by_owner(&identity.identity_id).await {
        Ok(secrets) => {
            Html(views::my_secrets_page(identity.username.as_deref(), &secrets)).into_response()
        }
        Err(e) => {
            e.log();
            Redirect::to("/").into_response()
        }
    }
}

/// GET /submit
pub async fn submit_page() -> Html<String> {
    Html(views::submit_page())
}

/// POST /submit
///
/// Creates a secret owned by the caller and redirects to the listing.
pub async fn submit<R>(
    State(state): State<SecretsAppState<R>>,
    Extension(identity): Extension<CurrentIdentity>,
    Form(form): Form<SubmitForm>,
) -> Response
where
    R: SecretRepository + Clone + Send + Sync + 'static,
{
    let use_case = SubmitSecretUseCase::new(state.repo.clone());

    let input = SubmitSecretInput {
        owner_id: identity.identity_id,
        body: form.secret,
    };

    match use_case.execute(input).await {
        Ok(_) => Redirect::to("/secrets").into_response(),
        Err(e) => {
            e.log();
            Redirect::to("/submit").into_response()
        }
    }
}
