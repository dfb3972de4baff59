/// Pipeline request and result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use scribeflow_shared::models::article::{ArticleSection, BlogContent, ContentAnalysis, KeywordSet};

/// One generation request, validated once and never mutated afterwards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRequest {
    /// Source URL to extract content from
    pub url: String,

    /// Desired article tone (e.g. "informative", "casual")
    pub tone: String,

    /// Target article length in words
    pub word_count: usize,
}

/// Raw content pulled from the source URL, before cleaning
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    /// Page title, empty when the document has none
    pub title: String,

    /// Visible text with markup stripped
    pub text: String,
}

/// Article produced by the generator, before images and SEO scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArticle {
    pub title: String,
    pub meta_description: String,
    pub introduction: String,
    pub sections: Vec<ArticleSection>,
    pub conclusion: String,
}

impl GeneratedArticle {
    /// Full article text in reading order
    pub fn full_text(&self) -> String {
        let mut parts = Vec::with_capacity(self.sections.len() + 3);
        parts.push(self.title.clone());
        parts.push(self.introduction.clone());
        for section in &self.sections {
            parts.push(section.heading.clone());
            parts.push(section.content.clone());
        }
        parts.push(self.conclusion.clone());
        parts.join("\n\n")
    }
}

/// Output of the SEO post-processing stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoReport {
    /// Words across the final article body
    pub word_count: usize,

    /// Score out of 100
    pub seo_score: u32,

    /// Keyword -> occurrence count in the article text
    pub keyword_matches: BTreeMap<String, usize>,
}

/// Result of one successful pipeline run
///
/// Carries everything the response needs: the persisted artifact id, the
/// article, the analysis payloads that produced it, and the wall-clock time
/// in seconds (two decimal places), measured from pipeline start through
/// persistence and the audit write.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    /// Persisted artifact id
    pub artifact_id: Uuid,

    /// Final article with images attached
    pub blog: BlogContent,

    /// Keyword analysis payload
    pub keywords: KeywordSet,

    /// Topic analysis payload
    pub analysis: ContentAnalysis,

    /// Word count from the SEO pass
    pub word_count: usize,

    /// SEO score out of 100
    pub seo_score: u32,

    /// Elapsed seconds, rounded to two decimals
    pub processing_time: f64,

    /// When the artifact was persisted
    pub generated_at: DateTime<Utc>,
}
