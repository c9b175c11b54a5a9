//! Identity Entity
//!
//! One registered account. An identity is reachable by exactly one of
//! {username, external provider link} at creation time: local registration
//! always sets a username, provider-created identities never do.
//! Identities are never deleted.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{identity_id::IdentityId, username::Username};

/// Identity entity
///
/// Sensitive credential data lives in the Credential entity; provider
/// subject ids live in ProviderLink rows.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Internal UUID identifier, immutable
    pub identity_id: IdentityId,
    /// Login name; absent for identities created via an external provider
    pub username: Option<Username>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a locally-registered identity
    pub fn new_local(username: Username) -> Self {
        let now = Utc::now();
        Self {
            identity_id: IdentityId::new(),
            username: Some(username),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an identity for a first-time external sign-in
    pub fn new_external() -> Self {
        let now = Utc::now();
        Self {
            identity_id: IdentityId::new(),
            username: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Login name as stored, if any
    pub fn username_str(&self) -> Option<&str> {
        self.username.as_ref().map(|u| u.original())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_identity_has_username() {
        let identity = Identity::new_local(Username::new("alice").unwrap());
        assert_eq!(identity.username_str(), Some("alice"));
    }

    #[test]
    fn test_external_identity_has_no_username() {
        let identity = Identity::new_external();
        assert!(identity.username.is_none());
        assert_eq!(identity.username_str(), None);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Identity::new_external();
        let b = Identity::new_external();
        assert_ne!(a.identity_id, b.identity_id);
    }
}
