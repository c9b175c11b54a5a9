//! Submit Secret Use Case
//!
//! Persists one posted secret for the authenticated caller. No validation
//! is performed on the body; persistence is the only side effect.

use std::sync::Arc;

use kernel::id::IdentityId;

use crate::domain::entity::Secret;
use crate::domain::repository::SecretRepository;
use crate::error::SecretsResult;

/// Submit input
pub struct SubmitSecretInput {
    pub owner_id: IdentityId,
    pub body: String,
}

/// Submit secret use case
pub struct SubmitSecretUseCase<R>
where
    R: SecretRepository,
{
    repo: Arc<R>,
}

impl<R> SubmitSecretUseCase<R>
where
    R: SecretRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: SubmitSecretInput) -> SecretsResult<Secret> {
        let secret = Secret::new(input.owner_id, input.body);

        self.repo.create(&secret).await?;

        tracing::info!(
            secret_id = %secret.secret_id,
            owner_id = %secret.owner_id,
            "Secret posted"
        );

        Ok(secret)
    }
}
