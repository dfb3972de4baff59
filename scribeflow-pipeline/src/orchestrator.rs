/// Pipeline orchestrator
///
/// Sequences the stage collaborators for one generation request, enforces
/// the per-stage failure policy, assembles the final artifact, persists it,
/// and records the audit entry.
///
/// # Architecture
///
/// ```text
/// PipelineOrchestrator
///   ├─> UrlValidator:      reject bad input before any I/O      (fatal)
///   ├─> ContentExtractor:  fetch + strip the source page        (fatal)
///   ├─> TextCleaner:       normalize text                       (fatal if empty)
///   ├─> KeywordExtractor:  rank keywords                        (fatal)
///   ├─> TopicAnalyzer:     summary / intent / topics            (fatal)
///   ├─> PromptBuilder:     fold analysis into one prompt        (fatal)
///   ├─> ArticleGenerator:  external model call                  (fatal)
///   ├─> ImageFetcher:      hero + section imagery               (degradable)
///   ├─> SeoPostProcessor:  word count + score                   (fatal)
///   └─> ArtifactStore + AuditStore: persist, then log
/// ```
///
/// # Concurrency
///
/// The orchestrator is stateless per invocation: every collaborator handle
/// is constructed once at startup and shared read-only, so concurrent runs
/// never contend. Stages execute sequentially within one request's task;
/// external calls are bounded by a per-stage timeout that converts an
/// overrun into that stage's ordinary failure path.
///
/// There is no user-level cancellation: a client that disconnects stops
/// observing the run, but the run itself completes (and persists its
/// artifact) regardless.

use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::stages::clean::TextCleaner;
use crate::stages::keywords::KeywordExtractor;
use crate::stages::prompt::{PromptBuilder, PromptInputs};
use crate::stages::seo::SeoPostProcessor;
use crate::stages::topics::TopicAnalyzer;
use crate::stages::validate::UrlValidator;
use crate::stages::{ArticleGenerator, ContentExtractor, ImageFetcher, StageError, StageResult};
use crate::types::{PipelineOutcome, PipelineRequest};
use scribeflow_shared::models::article::{BlogContent, ImageData};
use scribeflow_shared::models::artifact::NewArtifact;
use scribeflow_shared::models::audit::AuditAction;
use scribeflow_shared::store::{record_action, ArtifactStore, AuditStore};

/// Orchestrator tuning knobs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound on each external stage call
    pub stage_timeout: Duration,

    /// Supplementary images requested per article
    pub section_image_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            stage_timeout: Duration::from_secs(30),
            section_image_count: 3,
        }
    }
}

/// Sequences one generation request through the stage collaborators
pub struct PipelineOrchestrator {
    validator: UrlValidator,
    cleaner: TextCleaner,
    keywords: KeywordExtractor,
    topics: TopicAnalyzer,
    prompts: PromptBuilder,
    seo: SeoPostProcessor,
    extractor: Arc<dyn ContentExtractor>,
    generator: Arc<dyn ArticleGenerator>,
    images: Arc<dyn ImageFetcher>,
    artifacts: Arc<dyn ArtifactStore>,
    audit: Arc<dyn AuditStore>,
    config: PipelineConfig,
}

impl PipelineOrchestrator {
    /// Creates an orchestrator with default configuration
    ///
    /// Collaborators are injected once here and reused across requests.
    pub fn new(
        extractor: Arc<dyn ContentExtractor>,
        generator: Arc<dyn ArticleGenerator>,
        images: Arc<dyn ImageFetcher>,
        artifacts: Arc<dyn ArtifactStore>,
        audit: Arc<dyn AuditStore>,
    ) -> Self {
        Self::with_config(
            extractor,
            generator,
            images,
            artifacts,
            audit,
            PipelineConfig::default(),
        )
    }

    /// Creates an orchestrator with custom configuration
    pub fn with_config(
        extractor: Arc<dyn ContentExtractor>,
        generator: Arc<dyn ArticleGenerator>,
        images: Arc<dyn ImageFetcher>,
        artifacts: Arc<dyn ArtifactStore>,
        audit: Arc<dyn AuditStore>,
        config: PipelineConfig,
    ) -> Self {
        PipelineOrchestrator {
            validator: UrlValidator::new(),
            cleaner: TextCleaner::new(),
            keywords: KeywordExtractor::new(),
            topics: TopicAnalyzer::new(),
            prompts: PromptBuilder::new(),
            seo: SeoPostProcessor::new(),
            extractor,
            generator,
            images,
            artifacts,
            audit,
            config,
        }
    }

    /// Handle to the injected generator (for cost estimation endpoints)
    pub fn generator(&self) -> Arc<dyn ArticleGenerator> {
        self.generator.clone()
    }

    /// Runs the full pipeline for one request
    ///
    /// On success the artifact has been persisted for `owner_id` and a
    /// `generate_blog` audit entry attempted; on any fatal stage failure
    /// nothing is persisted and no audit entry is written.
    pub async fn run(
        &self,
        owner_id: Uuid,
        request: &PipelineRequest,
    ) -> Result<PipelineOutcome, PipelineError> {
        let started = Instant::now();

        tracing::info!(
            owner_id = %owner_id,
            url = %request.url,
            tone = %request.tone,
            word_count = request.word_count,
            "Starting article generation pipeline"
        );

        tracing::info!("Stage 1/9: validating URL");
        self.validator
            .validate(&request.url)
            .map_err(PipelineError::InvalidInput)?;

        tracing::info!("Stage 2/9: extracting content");
        let content = self
            .bounded(self.extractor.extract(&request.url))
            .await
            .map_err(|e| PipelineError::ExtractionFailed(e.to_string()))?;

        tracing::info!("Stage 3/9: cleaning text");
        let cleaned = self.cleaner.clean(&content.text);
        if cleaned.is_empty() {
            return Err(PipelineError::NoContent);
        }

        tracing::info!("Stage 4/9: extracting keywords");
        let keywords = self
            .keywords
            .extract(&cleaned)
            .map_err(PipelineError::AnalysisFailed)?;

        tracing::info!("Stage 5/9: analyzing topics");
        let analysis = self
            .topics
            .analyze(&cleaned, &content.title, &keywords.primary_keywords);

        tracing::info!("Stage 6/9: building prompt");
        let prompt = self.prompts.build(&PromptInputs {
            url: &request.url,
            title: &content.title,
            keywords: &keywords,
            analysis: &analysis,
            tone: &request.tone,
            word_count: request.word_count,
        });

        tracing::info!("Stage 7/9: generating article");
        let article = self
            .bounded(self.generator.generate(&prompt))
            .await
            .map_err(|e| PipelineError::GenerationFailed(e.to_string()))?;

        tracing::info!("Stage 8/9: fetching images");
        let (featured_image, additional_images) =
            self.fetch_images(&keywords.primary_keywords).await;

        tracing::info!("Stage 9/9: SEO post-processing");
        let report = self
            .seo
            .process(&article, &keywords.all_keywords(), request.word_count)
            .map_err(PipelineError::PostProcessFailed)?;

        let blog = BlogContent {
            title: article.title,
            meta_description: article.meta_description,
            introduction: article.introduction,
            sections: article.sections,
            conclusion: article.conclusion,
            featured_image,
            additional_images,
        };

        let artifact = self
            .artifacts
            .insert(NewArtifact {
                owner_id,
                source_url: request.url.clone(),
                blog: blog.clone(),
                keywords: keywords.clone(),
                analysis: analysis.clone(),
                word_count: report.word_count,
                seo_score: report.seo_score,
                processing_time_ms: started.elapsed().as_millis() as u64,
            })
            .await?;

        record_action(
            self.audit.as_ref(),
            owner_id,
            AuditAction::GenerateBlog,
            json!({
                "url": request.url,
                "title": artifact.title,
                "blog_id": artifact.id,
            }),
        )
        .await;

        // Elapsed time covers everything up to here, persistence and audit
        // included.
        let processing_time = (started.elapsed().as_secs_f64() * 100.0).round() / 100.0;

        tracing::info!(
            artifact_id = %artifact.id,
            word_count = report.word_count,
            seo_score = report.seo_score,
            processing_time,
            "Pipeline completed"
        );

        Ok(PipelineOutcome {
            artifact_id: artifact.id,
            blog,
            keywords,
            analysis,
            word_count: report.word_count,
            seo_score: report.seo_score,
            processing_time,
            generated_at: artifact.generated_at,
        })
    }

    /// Applies the per-stage timeout to an external call
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = StageResult<T>> + Send,
    ) -> StageResult<T> {
        match tokio::time::timeout(self.config.stage_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StageError::new(format!(
                "stage timed out after {:?}",
                self.config.stage_timeout
            ))),
        }
    }

    /// Degradable image stage: any failure logs a warning and yields no
    /// imagery instead of aborting the run
    async fn fetch_images(&self, keywords: &[String]) -> (Option<ImageData>, Vec<ImageData>) {
        let featured = match self.bounded(self.images.featured_image(keywords)).await {
            Ok(featured) => featured,
            Err(e) => {
                tracing::warn!(error = %e, "Image fetch failed, continuing without images");
                return (None, Vec::new());
            }
        };

        let additional = match self
            .bounded(
                self.images
                    .section_images(keywords, self.config.section_image_count),
            )
            .await
        {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(error = %e, "Section image fetch failed, continuing without them");
                Vec::new()
            }
        };

        (featured, additional)
    }
}
