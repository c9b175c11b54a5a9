//! Session Manager
//!
//! Issues an opaque signed token after successful authentication, resolves
//! the token back to an identity on each request, and destroys it on
//! logout.
//!
//! State machine: Anonymous -> Authenticated -> Anonymous. A resolve
//! against a corrupted or unknown token never raises an error to the
//! caller; it degrades to Anonymous.

use std::sync::Arc;

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::{auth_session::AuthSession, identity::Identity};
use crate::domain::repository::SessionRepository;
use crate::error::{AuthError, AuthResult};
use crate::domain::value_object::identity_id::IdentityId;

/// The resolved caller: the serialized `{id, username}` reference
#[derive(Debug, Clone)]
pub struct CurrentIdentity {
    pub identity_id: IdentityId,
    pub username: Option<String>,
}

/// Session manager
pub struct SessionManager<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SessionManager<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Establish a session for a freshly-authenticated identity
    ///
    /// Returns the session and the signed token for the cookie.
    pub async fn establish(&self, identity: &Identity) -> AuthResult<(AuthSession, String)> {
        let ttl = chrono::Duration::from_std(self.config.session_ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid session TTL: {e}")))?;

        let session = AuthSession::new(
            identity.identity_id,
            identity.username_str().map(str::to_string),
            ttl,
        );

        self.session_repo.create(&session).await?;

        let token = self.sign_token(session.session_id);

        tracing::info!(
            identity_id = %identity.identity_id,
            session_id = %session.session_id,
            "Session established"
        );

        Ok((session, token))
    }

    /// Resolve a token to the current identity
    ///
    /// Any failure (bad signature, unknown session, expired row) is
    /// Anonymous, never an error.
    pub async fn resolve(&self, token: &str) -> Option<CurrentIdentity> {
        let session_id = self.parse_token(token).ok()?;

        let session = match self.session_repo.find_by_id(session_id).await {
            Ok(found) => found?,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed, treating as anonymous");
                return None;
            }
        };

        if session.is_expired() {
            return None;
        }

        Some(CurrentIdentity {
            identity_id: session.identity_id,
            username: session.username,
        })
    }

    /// Destroy the session behind a token
    ///
    /// Idempotent: destroying an already-absent or unparseable token is not
    /// an error.
    pub async fn destroy(&self, token: &str) -> AuthResult<()> {
        let Ok(session_id) = self.parse_token(token) else {
            return Ok(());
        };

        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "Session destroyed");
        Ok(())
    }

    /// Generate signed session token: `"{session_id}.{base64url(sig)}"`
    pub fn sign_token(&self, session_id: Uuid) -> String {
        let session_id = session_id.to_string();

        let mut mac = Hmac::<Sha256>::new_from_slice(&self.config.session_secret)
            .expect("HMAC can take key of any size");
        mac.update(session_id.as_bytes());
        let signature = mac.finalize().into_bytes();

        format!(
            "{}.{}",
            session_id,
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
        )
    }

    /// Parse and verify a session token
    fn parse_token(&self, token: &str) -> AuthResult<Uuid> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 2 {
            return Err(AuthError::SessionInvalid);
        }

        let session_id_str = parts[0];
        let signature_b64 = parts[1];

        // Verify signature
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.config.session_secret)
            .expect("HMAC can take key of any size");
        mac.update(session_id_str.as_bytes());

        let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::SessionInvalid)?;

        mac.verify_slice(&signature)
            .map_err(|_| AuthError::SessionInvalid)?;

        // Parse UUID
        session_id_str
            .parse()
            .map_err(|_| AuthError::SessionInvalid)
    }
}
