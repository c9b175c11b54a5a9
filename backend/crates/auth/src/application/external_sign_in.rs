//! External Sign-In Use Case
//!
//! Normalizes an external provider profile into the internal Identity
//! abstraction via find-or-create. The rest of the system never
//! distinguishes how an identity authenticated.

use std::sync::Arc;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::ProviderLinkRepository;
use crate::domain::value_object::provider::Provider;
use crate::error::{AuthError, AuthResult};

/// Normalized profile returned by a provider after the code exchange
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub provider: Provider,
    /// Provider-issued stable subject identifier
    pub subject: String,
    /// Email, when the provider grants the scope
    pub email: Option<String>,
}

/// External sign-in use case
pub struct ExternalSignInUseCase<P>
where
    P: ProviderLinkRepository,
{
    link_repo: Arc<P>,
}

impl<P> ExternalSignInUseCase<P>
where
    P: ProviderLinkRepository,
{
    pub fn new(link_repo: Arc<P>) -> Self {
        Self { link_repo }
    }

    pub async fn execute(&self, profile: ProviderProfile) -> AuthResult<Identity> {
        if profile.subject.is_empty() {
            return Err(AuthError::ExternalAuthFailure(
                "provider profile has no subject id".to_string(),
            ));
        }

        let identity = self
            .link_repo
            .find_or_create(profile.provider, &profile.subject)
            .await?;

        tracing::info!(
            identity_id = %identity.identity_id,
            provider = %profile.provider,
            has_email = profile.email.is_some(),
            "External sign-in"
        );

        Ok(identity)
    }
}
