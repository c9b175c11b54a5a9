//! Auth Session Entity
//!
//! Server-side record binding an opaque client-held token to an identity
//! reference. The client never sees the row, only the signed token.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::value_object::identity_id::IdentityId;

/// Auth session entity
///
/// `username` is a snapshot of the identity's login name at session
/// creation (the serialized `{id, username}` reference), kept so protected
/// views can label the caller without another lookup.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    /// Reference to Identity
    pub identity_id: IdentityId,
    /// Username snapshot; None for provider-created identities
    pub username: Option<String>,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    /// Create a new auth session
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(identity_id: IdentityId, username: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            identity_id,
            username,
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// Get remaining time until expiration
    pub fn remaining_ms(&self) -> i64 {
        let now_ms = Utc::now().timestamp_millis();
        (self.expires_at_ms - now_ms).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_not_expired() {
        let session = AuthSession::new(IdentityId::new(), None, Duration::hours(1));
        assert!(!session.is_expired());
        assert!(session.remaining_ms() > 0);
    }

    #[test]
    fn test_zero_ttl_session_expired() {
        let session = AuthSession::new(IdentityId::new(), None, Duration::milliseconds(-1));
        assert!(session.is_expired());
        assert_eq!(session.remaining_ms(), 0);
    }

    #[test]
    fn test_username_snapshot_kept() {
        let session = AuthSession::new(
            IdentityId::new(),
            Some("alice".to_string()),
            Duration::hours(1),
        );
        assert_eq!(session.username.as_deref(), Some("alice"));
    }
}
