//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession, credential::Credential, identity::Identity,
    provider_link::ProviderLink,
};
use crate::domain::repository::{
    CredentialRepository, IdentityRepository, ProviderLinkRepository, SessionRepository,
};
use crate::domain::value_object::{
    identity_id::IdentityId, password::StoredPassword, provider::Provider, username::Username,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }

    async fn find_identity_by_link(
        &self,
        provider: Provider,
        subject_id: &str,
    ) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                i.identity_id,
                i.username,
                i.created_at,
                i.updated_at
            FROM identities i
            JOIN provider_links l ON l.identity_id = i.identity_id
            WHERE l.provider = $1 AND l.subject_id = $2
            "#,
        )
        .bind(provider.as_str())
        .bind(subject_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IdentityRow::into_identity))
    }
}

// ============================================================================
// Identity Repository Implementation
// ============================================================================

impl IdentityRepository for PgAuthRepository {
    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO identities (
                identity_id,
                username,
                username_canonical,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(identity.identity_id.as_uuid())
        .bind(identity.username.as_ref().map(Username::original))
        .bind(identity.username.as_ref().map(Username::canonical))
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // The unique index on username_canonical is the authority
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                identity_id,
                username,
                created_at,
                updated_at
            FROM identities
            WHERE identity_id = $1
            "#,
        )
        .bind(identity_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IdentityRow::into_identity))
    }

    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                identity_id,
                username,
                created_at,
                updated_at
            FROM identities
            WHERE username_canonical = $1
            "#,
        )
        .bind(username.canonical())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IdentityRow::into_identity))
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAuthRepository {
    async fn create(&self, credential: &Credential) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO credentials (
                identity_id,
                password_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(credential.identity_id.as_uuid())
        .bind(credential.password_hash.as_phc_string())
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_identity_id(
        &self,
        identity_id: &IdentityId,
    ) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                identity_id,
                password_hash,
                created_at,
                updated_at
            FROM credentials
            WHERE identity_id = $1
            "#,
        )
        .bind(identity_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRow::into_credential).transpose()
    }
}

// ============================================================================
// Provider Link Repository Implementation
// ============================================================================

impl ProviderLinkRepository for PgAuthRepository {
    async fn find_or_create(&self, provider: Provider, subject_id: &str) -> AuthResult<Identity> {
        // Fast path: link already exists
        if let Some(identity) = self.find_identity_by_link(provider, subject_id).await? {
            return Ok(identity);
        }

        // Slow path: provisionally insert identity + link in one
        // transaction. ON CONFLICT DO NOTHING on the link closes the race
        // window between concurrent first-time sign-ins: the loser rolls
        // back its provisional identity and reads the winner's row.
        let identity = Identity::new_external();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO identities (
                identity_id,
                username,
                username_canonical,
                created_at,
                updated_at
            ) VALUES ($1, NULL, NULL, $2, $3)
            "#,
        )
        .bind(identity.identity_id.as_uuid())
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&mut *tx)
        .await?;

        let link = ProviderLink::new(identity.identity_id, provider, subject_id.to_string());

        let inserted = sqlx::query(
            r#"
            INSERT INTO provider_links (provider, subject_id, identity_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (provider, subject_id) DO NOTHING
            "#,
        )
        .bind(link.provider.as_str())
        .bind(&link.subject_id)
        .bind(link.identity_id.as_uuid())
        .bind(link.created_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 1 {
            tx.commit().await?;
            tracing::info!(
                identity_id = %identity.identity_id,
                provider = %provider,
                "Created identity for first-time external sign-in"
            );
            return Ok(identity);
        }

        // Lost the race; discard the provisional identity
        tx.rollback().await?;

        self.find_identity_by_link(provider, subject_id)
            .await?
            .ok_or_else(|| AuthError::Internal("provider link vanished after conflict".to_string()))
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                identity_id,
                username,
                expires_at_ms,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.session_id)
        .bind(session.identity_id.as_uuid())
        .bind(&session.username)
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                identity_id,
                username,
                expires_at_ms,
                created_at
            FROM sessions
            WHERE session_id = $1 AND expires_at_ms > $2
            "#,
        )
        .bind(session_id)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        // Zero rows affected is fine: destroy is idempotent
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        self.cleanup_expired().await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct IdentityRow {
    identity_id: Uuid,
    username: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self) -> Identity {
        Identity {
            identity_id: IdentityId::from_uuid(self.identity_id),
            username: self.username.as_deref().map(Username::from_db),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    identity_id: Uuid,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> AuthResult<Credential> {
        Ok(Credential {
            identity_id: IdentityId::from_uuid(self.identity_id),
            password_hash: StoredPassword::from_db(self.password_hash)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    identity_id: Uuid,
    username: Option<String>,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AuthSession {
        AuthSession {
            session_id: self.session_id,
            identity_id: IdentityId::from_uuid(self.identity_id),
            username: self.username,
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        }
    }
}
