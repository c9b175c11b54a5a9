//! Provider Link Entity
//!
//! Binds an external provider subject id to an internal identity.
//! `(provider, subject_id)` is unique; a row is created at most once per
//! external account via the find-or-create upsert.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{identity_id::IdentityId, provider::Provider};

/// Provider link entity
#[derive(Debug, Clone)]
pub struct ProviderLink {
    /// Reference to Identity
    pub identity_id: IdentityId,
    /// External provider
    pub provider: Provider,
    /// Provider-issued stable subject identifier
    pub subject_id: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl ProviderLink {
    /// Create a new provider link
    pub fn new(identity_id: IdentityId, provider: Provider, subject_id: String) -> Self {
        Self {
            identity_id,
            provider,
            subject_id,
            created_at: Utc::now(),
        }
    }
}
