//! Secret Entity
//!
//! One posted text item, owned by one identity. Immutable once created.
//! The owner reference is not enforced as a foreign key: identities are
//! never deleted, so the reference cannot orphan.

use chrono::{DateTime, Utc};
use kernel::id::{IdentityId, SecretId};

/// Secret entity
#[derive(Debug, Clone)]
pub struct Secret {
    /// Unique identifier
    pub secret_id: SecretId,
    /// Owning identity
    pub owner_id: IdentityId,
    /// Free-form text; no length or content validation
    pub body: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Secret {
    /// Create a new secret
    pub fn new(owner_id: IdentityId, body: String) -> Self {
        Self {
            secret_id: SecretId::new(),
            owner_id,
            body,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_kept_verbatim() {
        let owner = IdentityId::new();
        let secret = Secret::new(owner, "  anything goes, even    whitespace\n".to_string());
        assert_eq!(secret.body, "  anything goes, even    whitespace\n");
        assert_eq!(secret.owner_id, owner);
    }

    #[test]
    fn test_empty_body_allowed() {
        let secret = Secret::new(IdentityId::new(), String::new());
        assert!(secret.body.is_empty());
    }
}
