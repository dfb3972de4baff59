/// Store adapters
///
/// Persistence is reached through three narrow adapter traits, one per
/// concern: user credentials, the audit trail, and generated artifacts.
/// Handlers and the pipeline orchestrator hold `Arc<dyn ...>` handles that
/// are constructed once at startup and injected — there is no global lookup.
///
/// Two implementations ship with the workspace:
///
/// - [`postgres`]: the production adapter backed by sqlx/PostgreSQL, with
///   JSONB columns for the document-shaped payloads
/// - [`memory`]: an in-process adapter used by the test suites and offline
///   demos

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::artifact::{Artifact, NewArtifact};
use crate::models::audit::{AuditAction, AuditEntry};
use crate::models::user::{NewUser, UserRecord};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint violated (e.g. duplicate email)
    #[error("Record already exists")]
    Duplicate,

    /// Store unreachable or not configured
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure
    #[error("Store operation failed: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// User record persistence
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a new user; `StoreError::Duplicate` if the email is taken.
    ///
    /// The unique index is the authority — a concurrent insert racing past a
    /// pre-check still surfaces as `Duplicate` here.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Looks a user up by email (equality)
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Looks a user up by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Connectivity probe for health reporting
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Append-only audit trail persistence
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Appends one entry; entries are never updated or deleted
    async fn append(
        &self,
        user_id: Uuid,
        action: AuditAction,
        data: JsonValue,
    ) -> Result<AuditEntry, StoreError>;

    /// Returns a user's entries, newest first, capped at `limit`
    async fn list_for_user(&self, user_id: Uuid, limit: i64)
        -> Result<Vec<AuditEntry>, StoreError>;
}

/// Generated artifact persistence
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persists one artifact; called exactly once per successful run
    async fn insert(&self, artifact: NewArtifact) -> Result<Artifact, StoreError>;

    /// Fetches an artifact by `(id, owner)` equality
    ///
    /// An artifact owned by a different identity is indistinguishable from a
    /// missing one: both return `Ok(None)`.
    async fn find_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Artifact>, StoreError>;
}

/// Best-effort audit append
///
/// Attempted synchronously so callers observe the write, but a failure is
/// logged and swallowed: audit logging never fails the operation it
/// accompanies.
pub async fn record_action(
    audit: &dyn AuditStore,
    user_id: Uuid,
    action: AuditAction,
    data: JsonValue,
) {
    if let Err(e) = audit.append(user_id, action, data).await {
        tracing::warn!(
            user_id = %user_id,
            action = %action,
            error = %e,
            "Failed to write audit entry"
        );
    }
}
