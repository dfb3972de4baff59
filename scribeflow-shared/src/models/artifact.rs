/// Persisted generation artifacts
///
/// An artifact is the durable output of one successful pipeline run. It is
/// created exactly once, never mutated, and owned by the identity that
/// requested the run. Ownership is enforced at read time as well as write
/// time: a lookup for someone else's artifact behaves exactly like a lookup
/// for a missing one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE artifacts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL,
///     source_url TEXT NOT NULL,
///     title TEXT NOT NULL,
///     blog JSONB NOT NULL,
///     keywords JSONB NOT NULL,
///     analysis JSONB NOT NULL,
///     word_count BIGINT NOT NULL,
///     seo_score BIGINT NOT NULL,
///     processing_time_ms BIGINT NOT NULL,
///     generated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE INDEX artifacts_owner_idx ON artifacts (owner_id, generated_at DESC);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::article::{BlogContent, ContentAnalysis, KeywordSet};

/// A persisted generation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact id
    pub id: Uuid,

    /// Identity that requested the run
    pub owner_id: Uuid,

    /// URL the content was extracted from
    pub source_url: String,

    /// Article title (duplicated out of `blog` for listings)
    pub title: String,

    /// Generated article document
    pub blog: BlogContent,

    /// Keyword analysis that steered generation
    pub keywords: KeywordSet,

    /// Topic analysis of the source content
    pub analysis: ContentAnalysis,

    /// Word count reported by the SEO pass
    pub word_count: usize,

    /// SEO score out of 100
    pub seo_score: u32,

    /// Pipeline wall-clock time up to assembly, in milliseconds
    pub processing_time_ms: u64,

    /// When the artifact was created
    pub generated_at: DateTime<Utc>,
}

/// Input for persisting a new artifact
#[derive(Debug, Clone)]
pub struct NewArtifact {
    /// Identity that requested the run
    pub owner_id: Uuid,

    /// URL the content was extracted from
    pub source_url: String,

    /// Generated article document
    pub blog: BlogContent,

    /// Keyword analysis payload
    pub keywords: KeywordSet,

    /// Topic analysis payload
    pub analysis: ContentAnalysis,

    /// Word count reported by the SEO pass
    pub word_count: usize,

    /// SEO score out of 100
    pub seo_score: u32,

    /// Pipeline wall-clock time up to assembly, in milliseconds
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article::ArticleSection;

    #[test]
    fn test_artifact_json_roundtrip() {
        let artifact = Artifact {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            source_url: "https://example.com".to_string(),
            title: "Title".to_string(),
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
                primary_keywords: vec!["example".to_string()],
                secondary_keywords: vec![],
                keyword_density: Default::default(),
            },
            analysis: ContentAnalysis {
                summary: "Summary".to_string(),
                intent: "informational".to_string(),
                topics: vec!["example".to_string()],
                content_length: 120,
            },
            word_count: 5,
            seo_score: 72,
            processing_time_ms: 1530,
            generated_at: Utc::now(),
        };

        let json = serde_json::to_value(&artifact).unwrap();
        let back: Artifact = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, artifact.id);
        assert_eq!(back.owner_id, artifact.owner_id);
        assert_eq!(back.blog, artifact.blog);
        assert_eq!(back.seo_score, 72);
    }
}
