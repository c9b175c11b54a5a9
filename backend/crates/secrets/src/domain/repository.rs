//! Repository Traits

use crate::domain::entity::Secret;
use crate::error::SecretsResult;
use kernel::id::IdentityId;

/// Secret repository trait
///
/// `list_all` intentionally does not check the caller's identity;
/// authorization is enforced by the route layer before it is invoked.
#[trait_variant::make(SecretRepository: Send)]
pub trait LocalSecretRepository {
    /// Persist a new secret
    async fn create(&self, secret: &Secret) -> SecretsResult<()>;

    /// Every posted secret, newest first
    async fn list_all(&self) -> SecretsResult<Vec<Secret>>;

    /// Secrets whose owner matches exactly, newest first
    async fn list_by_owner(&self, owner_id: &IdentityId) -> SecretsResult<Vec<Secret>>;
}
