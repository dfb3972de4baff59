/// Pipeline stage collaborators
///
/// Each stage is one discrete transformation in the generation pipeline.
/// Stages with external I/O (content extraction, article generation, image
/// fetch) are trait objects so the orchestrator can be driven by the real
/// implementations in production and by the mocks in tests. The pure stages
/// (validation, cleaning, keyword extraction, topic analysis, prompt
/// construction, SEO scoring) are concrete values constructed once and
/// injected alongside them.
///
/// # Stage collaborators
///
/// - `validate`: URL validation
/// - `extract`: [`ContentExtractor`] + HTTP implementation
/// - `clean`: text cleaning
/// - `keywords`: keyword extraction and density
/// - `topics`: topic/intent analysis
/// - `prompt`: generation prompt construction
/// - `generate`: [`ArticleGenerator`] + Gemini implementation
/// - `images`: [`ImageFetcher`] + Unsplash implementation
/// - `seo`: SEO post-processing and scoring
/// - `mock`: deterministic collaborators for tests and demos

pub mod clean;
pub mod extract;
pub mod generate;
pub mod images;
pub mod keywords;
pub mod mock;
pub mod prompt;
pub mod seo;
pub mod topics;
pub mod validate;

use async_trait::async_trait;

use crate::types::{ExtractedContent, GeneratedArticle};
use scribeflow_shared::models::article::ImageData;

/// Failure of a single stage collaborator
///
/// Deliberately a bare message: the orchestrator assigns the
/// business-meaningful classification, not the collaborator.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StageError(pub String);

impl StageError {
    pub fn new(msg: impl Into<String>) -> Self {
        StageError(msg.into())
    }
}

/// Stage result type alias
pub type StageResult<T> = Result<T, StageError>;

/// Fetches a page and returns its title and visible text
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> StageResult<ExtractedContent>;
}

/// Produces an article from a generation prompt (the external model call)
#[async_trait]
pub trait ArticleGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> StageResult<GeneratedArticle>;

    /// Rough USD cost for a call of the given prompt/output size
    fn estimate_cost(&self, prompt_chars: usize, output_chars: usize) -> f64;

    /// Model identifier, for info endpoints and logs
    fn model_name(&self) -> &str;
}

/// Finds imagery for the generated article
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// One hero image for the article
    async fn featured_image(&self, keywords: &[String]) -> StageResult<Option<ImageData>>;

    /// Up to `count` supplementary images for body sections
    async fn section_images(&self, keywords: &[String], count: usize)
        -> StageResult<Vec<ImageData>>;
}
