/// PostgreSQL store adapters
///
/// Production implementations of the store traits backed by sqlx. The
/// document-shaped payloads (audit data, article body, keyword and topic
/// analyses) live in JSONB columns; everything queried by equality or range
/// is a scalar column with an index.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ArtifactStore, AuditStore, CredentialStore, StoreError};
use crate::models::artifact::{Artifact, NewArtifact};
use crate::models::audit::{AuditAction, AuditEntry};
use crate::models::user::{NewUser, UserRecord};

/// Runs schema migrations from `migrations/`
///
/// Idempotent; applied at startup before the stores are handed out.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| StoreError::Backend(format!("Migration failed: {}", e)))?;

    tracing::info!("Database migrations complete");
    Ok(())
}

/// Credential store backed by the `users` table
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, name, created_at, updated_at
            "#,
        )
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, name, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Row shape for audit reads
#[derive(sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    user_id: Uuid,
    action: String,
    data: JsonValue,
    timestamp: DateTime<Utc>,
}

impl From<AuditRow> for AuditEntry {
    fn from(row: AuditRow) -> Self {
        AuditEntry {
            id: row.id,
            user_id: row.user_id,
            action: row.action,
            data: row.data,
            timestamp: row.timestamp,
        }
    }
}

/// Audit store backed by the append-only `audit_log` table
#[derive(Clone)]
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn append(
        &self,
        user_id: Uuid,
        action: AuditAction,
        data: JsonValue,
    ) -> Result<AuditEntry, StoreError> {
        let row = sqlx::query_as::<_, AuditRow>(
            r#"
            INSERT INTO audit_log (user_id, action, data)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, action, data, timestamp
            "#,
        )
        .bind(user_id)
        .bind(action.as_str())
        .bind(data)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AuditEntry>, StoreError> {
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT id, user_id, action, data, timestamp
            FROM audit_log
            WHERE user_id = $1
            ORDER BY timestamp DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Row shape for artifact reads; JSONB payloads decode after the fetch
#[derive(sqlx::FromRow)]
struct ArtifactRow {
    id: Uuid,
    owner_id: Uuid,
    source_url: String,
    title: String,
    blog: JsonValue,
    keywords: JsonValue,
    analysis: JsonValue,
    word_count: i64,
    seo_score: i64,
    processing_time_ms: i64,
    generated_at: DateTime<Utc>,
}

impl TryFrom<ArtifactRow> for Artifact {
    type Error = StoreError;

    fn try_from(row: ArtifactRow) -> Result<Self, StoreError> {
        let decode =
            |what: &str, e: serde_json::Error| StoreError::Backend(format!("{}: {}", what, e));

        Ok(Artifact {
            id: row.id,
            owner_id: row.owner_id,
            source_url: row.source_url,
            title: row.title,
            blog: serde_json::from_value(row.blog)
                .map_err(|e| decode("Stored blog payload is corrupt", e))?,
            keywords: serde_json::from_value(row.keywords)
                .map_err(|e| decode("Stored keyword payload is corrupt", e))?,
            analysis: serde_json::from_value(row.analysis)
                .map_err(|e| decode("Stored analysis payload is corrupt", e))?,
            word_count: row.word_count.max(0) as usize,
            seo_score: row.seo_score.max(0) as u32,
            processing_time_ms: row.processing_time_ms.max(0) as u64,
            generated_at: row.generated_at,
        })
    }
}

/// Artifact store backed by the `artifacts` table
#[derive(Clone)]
pub struct PgArtifactStore {
    pool: PgPool,
}

impl PgArtifactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtifactStore for PgArtifactStore {
    async fn insert(&self, artifact: NewArtifact) -> Result<Artifact, StoreError> {
        let encode = |e: serde_json::Error| StoreError::Backend(format!("Encoding failed: {}", e));

        let blog = serde_json::to_value(&artifact.blog).map_err(encode)?;
        let keywords = serde_json::to_value(&artifact.keywords).map_err(encode)?;
        let analysis = serde_json::to_value(&artifact.analysis).map_err(encode)?;

        let row = sqlx::query_as::<_, ArtifactRow>(
            r#"
            INSERT INTO artifacts
                (owner_id, source_url, title, blog, keywords, analysis,
                 word_count, seo_score, processing_time_ms)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, owner_id, source_url, title, blog, keywords, analysis,
                      word_count, seo_score, processing_time_ms, generated_at
            "#,
        )
        .bind(artifact.owner_id)
        .bind(artifact.source_url)
        .bind(artifact.blog.title.clone())
        .bind(blog)
        .bind(keywords)
        .bind(analysis)
        .bind(artifact.word_count as i64)
        .bind(artifact.seo_score as i64)
        .bind(artifact.processing_time_ms as i64)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Artifact>, StoreError> {
        let row = sqlx::query_as::<_, ArtifactRow>(
            r#"
            SELECT id, owner_id, source_url, title, blog, keywords, analysis,
                   word_count, seo_score, processing_time_ms, generated_at
            FROM artifacts
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
