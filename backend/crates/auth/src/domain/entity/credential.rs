//! Credential Entity
//!
//! Local password credential for an identity. Separated from Identity so
//! sensitive data never travels with profile data. Identities created
//! purely via an external provider have no Credential row.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{identity_id::IdentityId, password::StoredPassword};

/// Local credential entity
#[derive(Debug, Clone)]
pub struct Credential {
    /// Reference to Identity
    pub identity_id: IdentityId,
    /// Argon2id password hash (PHC string)
    pub password_hash: StoredPassword,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Create a new credential
    pub fn new(identity_id: IdentityId, password_hash: StoredPassword) -> Self {
        let now = Utc::now();
        Self {
            identity_id,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
