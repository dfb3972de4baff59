/// In-memory store adapter
///
/// A single [`MemoryStore`] implements all three store traits over
/// `tokio::sync::RwLock`-guarded vectors. It backs the integration tests and
/// offline demos, and keeps the same observable semantics as the Postgres
/// adapter: unique emails, newest-first audit reads, and owner-scoped
/// artifact lookups.
///
/// `fail_audit_appends` makes every audit write fail, so tests can assert
/// that audit logging is best-effort and never sinks the primary operation.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ArtifactStore, AuditStore, CredentialStore, StoreError};
use crate::models::artifact::{Artifact, NewArtifact};
use crate::models::audit::{AuditAction, AuditEntry};
use crate::models::user::{NewUser, UserRecord};

/// In-process implementation of every store trait
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<UserRecord>>,
    audit: RwLock<Vec<AuditEntry>>,
    artifacts: RwLock<Vec<Artifact>>,
    fail_audit_appends: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent audit appends fail (for failure-tolerance tests)
    pub fn set_audit_failing(&self, failing: bool) {
        self.fail_audit_appends.store(failing, Ordering::SeqCst);
    }

    /// Number of persisted artifacts
    pub async fn artifact_count(&self) -> usize {
        self.artifacts.read().await.len()
    }

    /// Number of audit entries recorded for an action
    pub async fn audit_count(&self, action: AuditAction) -> usize {
        self.audit
            .read()
            .await
            .iter()
            .filter(|e| e.action == action.as_str())
            .count()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            created_at: now,
            updated_at: now,
        };

        users.push(record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(
        &self,
        user_id: Uuid,
        action: AuditAction,
        data: JsonValue,
    ) -> Result<AuditEntry, StoreError> {
        if self.fail_audit_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("audit store offline".to_string()));
        }

        let entry = AuditEntry {
            id: Uuid::new_v4(),
            user_id,
            action: action.as_str().to_string(),
            data,
            timestamp: Utc::now(),
        };

        self.audit.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AuditEntry>, StoreError> {
        let audit = self.audit.read().await;

        let mut entries: Vec<AuditEntry> = audit
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();

        // Newest first; insertion order breaks timestamp ties.
        entries.reverse();
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn insert(&self, artifact: NewArtifact) -> Result<Artifact, StoreError> {
        let record = Artifact {
            id: Uuid::new_v4(),
            owner_id: artifact.owner_id,
            source_url: artifact.source_url,
            title: artifact.blog.title.clone(),
            blog: artifact.blog,
            keywords: artifact.keywords,
            analysis: artifact.analysis,
            word_count: artifact.word_count,
            seo_score: artifact.seo_score,
            processing_time_ms: artifact.processing_time_ms,
            generated_at: Utc::now(),
        };

        self.artifacts.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Artifact>, StoreError> {
        Ok(self
            .artifacts
            .read()
            .await
            .iter()
            .find(|a| a.id == id && a.owner_id == owner_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article::{ArticleSection, BlogContent, ContentAnalysis, KeywordSet};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            name: None,
        }
    }

    fn new_artifact(owner_id: Uuid) -> NewArtifact {
        NewArtifact {
            owner_id,
            source_url: "https://example.com".to_string(),
            blog: BlogContent {
                title: "Title".to_string(),
                meta_description: "Meta".to_string(),
                introduction: "Intro".to_string(),
                sections: vec![ArticleSection {
                    heading: "H".to_string(),
                    content: "C".to_string(),
                }],
                conclusion: "End".to_string(),
                featured_image: None,
                additional_images: vec![],
            },
            keywords: KeywordSet {
                primary_keywords: vec![],
                secondary_keywords: vec![],
                keyword_density: Default::default(),
            },
            analysis: ContentAnalysis {
                summary: String::new(),
                intent: "informational".to_string(),
                topics: vec![],
                content_length: 0,
            },
            word_count: 5,
            seo_score: 50,
            processing_time_ms: 10,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();

        store.create_user(new_user("a@example.com")).await.unwrap();
        let result = store.create_user(new_user("a@example.com")).await;

        assert!(matches!(result, Err(StoreError::Duplicate)));
    }

    #[tokio::test]
    async fn test_audit_listing_is_newest_first_and_capped() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        for action in [AuditAction::Register, AuditAction::Login, AuditAction::Logout] {
            store
                .append(user_id, action, JsonValue::Null)
                .await
                .unwrap();
        }

        let entries = store.list_for_user(user_id, 2).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "logout");
        assert_eq!(entries[1].action, "login");
    }

    #[tokio::test]
    async fn test_audit_failure_switch() {
        let store = MemoryStore::new();
        store.set_audit_failing(true);

        let result = store
            .append(Uuid::new_v4(), AuditAction::Login, JsonValue::Null)
            .await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_artifact_ownership_scoping() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let artifact = store.insert(new_artifact(owner)).await.unwrap();

        assert!(store
            .find_for_owner(artifact.id, owner)
            .await
            .unwrap()
            .is_some());
        // Foreign lookup looks exactly like a missing artifact.
        assert!(store
            .find_for_owner(artifact.id, stranger)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_record_action_swallows_failures() {
        let store = MemoryStore::new();
        store.set_audit_failing(true);

        // Must not panic or propagate.
        super::super::record_action(&store, Uuid::new_v4(), AuditAction::Login, JsonValue::Null)
            .await;

        store.set_audit_failing(false);
        assert_eq!(store.audit_count(AuditAction::Login).await, 0);
    }
}
