//! Register Use Case
//!
//! Creates a new locally-registered identity with a password credential.

use std::sync::Arc;

use crate::domain::entity::{credential::Credential, identity::Identity};
use crate::domain::repository::{CredentialRepository, IdentityRepository};
use crate::domain::value_object::{
    password::{RawPassword, StoredPassword},
    username::Username,
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub username: String,
    pub password: String,
}

/// Register use case
pub struct RegisterUseCase<I, C>
where
    I: IdentityRepository,
    C: CredentialRepository,
{
    identity_repo: Arc<I>,
    credential_repo: Arc<C>,
}

impl<I, C> RegisterUseCase<I, C>
where
    I: IdentityRepository,
    C: CredentialRepository,
{
    pub fn new(identity_repo: Arc<I>, credential_repo: Arc<C>) -> Self {
        Self {
            identity_repo,
            credential_repo,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<Identity> {
        // Validate username
        let username =
            Username::new(input.username).map_err(|e| AuthError::Validation(e.to_string()))?;

        // Validate and hash password
        let raw_password = RawPassword::new(input.password)?;
        let password_hash = StoredPassword::from_raw(&raw_password)?;

        // Create identity; the storage layer's unique index is the
        // authority on duplicates
        let identity = Identity::new_local(username);
        self.identity_repo.create(&identity).await?;

        // Create local credential
        let credential = Credential::new(identity.identity_id, password_hash);
        self.credential_repo.create(&credential).await?;

        tracing::info!(
            identity_id = %identity.identity_id,
            username = %identity.username_str().unwrap_or_default(),
            "Identity registered"
        );

        Ok(identity)
    }
}
