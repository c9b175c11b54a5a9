//! Login Use Case
//!
//! Verifies a username/password pair against the credential store.
//! Unknown-username and wrong-password failures are indistinguishable to
//! the caller; the unknown-username path runs a dummy verification so both
//! failure modes do comparable work.

use std::sync::{Arc, LazyLock};

use crate::domain::entity::identity::Identity;
use crate::domain::repository::{CredentialRepository, IdentityRepository};
use crate::domain::value_object::{
    password::{RawPassword, StoredPassword},
    username::Username,
};
use crate::error::{AuthError, AuthResult};

/// Fixed hash verified against on the unknown-user path
static DUMMY_HASH: LazyLock<StoredPassword> = LazyLock::new(|| {
    let raw = RawPassword::new("dummy-password-for-timing".to_string())
        .expect("dummy password is valid");
    StoredPassword::from_raw(&raw).expect("dummy hash is computable")
});

/// Login input
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<I, C>
where
    I: IdentityRepository,
    C: CredentialRepository,
{
    identity_repo: Arc<I>,
    credential_repo: Arc<C>,
}

impl<I, C> LoginUseCase<I, C>
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

    pub async fn execute(&self, input: LoginInput) -> AuthResult<Identity> {
        // Malformed input is a credentials failure, never a detail leak
        let username =
            Username::new(input.username).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let identity = self.identity_repo.find_by_username(&username).await?;

        let Some(identity) = identity else {
            let _ = DUMMY_HASH.verify(&raw_password);
            return Err(AuthError::InvalidCredentials);
        };

        // Identity without local credentials (provider-created); same
        // dummy-work path
        let Some(credential) = self
            .credential_repo
            .find_by_identity_id(&identity.identity_id)
            .await?
        else {
            let _ = DUMMY_HASH.verify(&raw_password);
            return Err(AuthError::InvalidCredentials);
        };

        if !credential.password_hash.verify(&raw_password) {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(
            identity_id = %identity.identity_id,
            "Identity logged in"
        );

        Ok(identity)
    }
}
