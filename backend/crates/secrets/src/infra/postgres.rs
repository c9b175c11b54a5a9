//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kernel::id::{IdentityId, SecretId};

use crate::domain::entity::Secret;
use crate::domain::repository::SecretRepository;
use crate::error::SecretsResult;

/// PostgreSQL-backed secret repository
#[derive(Clone)]
pub struct PgSecretRepository {
    pool: PgPool,
}

impl PgSecretRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SecretRepository for PgSecretRepository {
    async fn create(&self, secret: &Secret) -> SecretsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO secrets (
                secret_id,
                owner_id,
                body,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(secret.secret_id.as_uuid())
        .bind(secret.owner_id.as_uuid())
        .bind(&secret.body)
        .bind(secret.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_all(&self) -> SecretsResult<Vec<Secret>> {
        let rows = sqlx::query_as::<_, SecretRow>(
            r#"
            SELECT
                secret_id,
                owner_id,
                body,
                created_at
            FROM secrets
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SecretRow::into_secret).collect())
    }

    async fn list_by_owner(&self, owner_id: &IdentityId) -> SecretsResult<Vec<Secret>> {
        let rows = sqlx::query_as::<_, SecretRow>(
            r#"
            SELECT
                secret_id,
                owner_id,
                body,
                created_at
            FROM secrets
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SecretRow::into_secret).collect())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct SecretRow {
    secret_id: Uuid,
    owner_id: Uuid,
    body: String,
    created_at: DateTime<Utc>,
}

impl SecretRow {
    fn into_secret(self) -> Secret {
        Secret {
            secret_id: SecretId::from_uuid(self.secret_id),
            owner_id: IdentityId::from_uuid(self.owner_id),
            body: self.body,
            created_at: self.created_at,
        }
    }
}
