//! List Secrets Use Case

use std::sync::Arc;

use kernel::id::IdentityId;

use crate::domain::entity::Secret;
use crate::domain::repository::SecretRepository;
use crate::error::SecretsResult;

/// List secrets use case
pub struct ListSecretsUseCase<R>
where
    R: SecretRepository,
{
    repo: Arc<R>,
}

impl<R> ListSecretsUseCase<R>
where
    R: SecretRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Every posted secret (the "all secrets" view)
    pub async fn all(&self) -> SecretsResult<Vec<Secret>> {
        self.repo.list_all().await
    }

    /// Only the caller's secrets
    pub async fn by_owner(&self, owner_id: &IdentityId) -> SecretsResult<Vec<Secret>> {
        self.repo.list_by_owner(owner_id).await
    }
}
