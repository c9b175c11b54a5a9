//! Password Value Objects
//!
//! Domain wrappers over `platform::password`. `RawPassword` is the
//! validated user input (zeroized on drop), `StoredPassword` the Argon2id
//! PHC string persisted with the credential.

use platform::password::{ClearTextPassword, HashedPassword};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Raw password from user input
///
/// Memory is automatically zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password with validation
    ///
    /// Rejects empty/whitespace-only input, overlong input, and control
    /// characters. Input is NFKC normalized before hashing.
    pub fn new(raw: String) -> AuthResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| AuthError::Validation(e.to_string()))
    }

    pub(crate) fn as_clear_text(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Hashed password for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPassword(HashedPassword);

impl StoredPassword {
    /// Hash a raw password for storage
    pub fn from_raw(raw: &RawPassword) -> AuthResult<Self> {
        raw.as_clear_text()
            .hash()
            .map(Self)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Restore from a PHC string loaded from the database
    pub fn from_db(phc: String) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Verify a raw password against this hash (constant-time)
    pub fn verify(&self, raw: &RawPassword) -> bool {
        self.0.verify(raw.as_clear_text())
    }

    /// PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}
