//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{auth_session::AuthSession, credential::Credential, identity::Identity};
use crate::domain::value_object::{
    identity_id::IdentityId, provider::Provider, username::Username,
};
use crate::error::AuthResult;
use uuid::Uuid;

/// Identity repository trait
#[trait_variant::make(IdentityRepository: Send)]
pub trait LocalIdentityRepository {
    /// Create a new identity
    ///
    /// Fails with `AuthError::DuplicateUsername` when the username is
    /// already taken; the storage layer's unique index is the authority.
    async fn create(&self, identity: &Identity) -> AuthResult<()>;

    /// Find identity by ID
    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>>;

    /// Find identity by username (canonical form)
    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<Identity>>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Create local credentials
    async fn create(&self, credential: &Credential) -> AuthResult<()>;

    /// Find credentials by identity ID
    async fn find_by_identity_id(
        &self,
        identity_id: &IdentityId,
    ) -> AuthResult<Option<Credential>>;
}

/// Provider link repository trait
#[trait_variant::make(ProviderLinkRepository: Send)]
pub trait LocalProviderLinkRepository {
    /// Find the identity linked to `(provider, subject_id)`, creating a new
    /// identity + link atomically when none exists.
    ///
    /// Idempotent: calling twice with the same pair returns the same
    /// identity, and concurrent first-time calls cannot create duplicates.
    async fn find_or_create(&self, provider: Provider, subject_id: &str) -> AuthResult<Identity>;
}

/// Auth session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    /// Find a non-expired session by ID
    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>>;

    /// Delete a session. Idempotent: deleting an absent session is not an
    /// error.
    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
