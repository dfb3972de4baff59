/// Generation endpoints
///
/// - `POST /generate-blog` — run the full pipeline for the caller
/// - `POST /estimate-cost` — rough model cost estimate, no pipeline run

use crate::{
    app::AppState,
    error::{validation_details, ApiResult},
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use scribeflow_pipeline::types::{PipelineOutcome, PipelineRequest};
use scribeflow_shared::auth::middleware::Identity;
use scribeflow_shared::models::article::{BlogContent, ContentAnalysis, KeywordSet};
use scribeflow_shared::models::artifact::Artifact;

/// Default article length when the request omits one
const DEFAULT_WORD_COUNT: usize = 800;

/// Default tone when the request omits one
const DEFAULT_TONE: &str = "informative";

/// Generation request
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateBlogRequest {
    /// Source URL
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Desired tone (default "informative")
    #[validate(length(max = 50, message = "Tone must be at most 50 characters"))]
    pub tone: Option<String>,

    /// Target word count (default 800)
    #[validate(range(min = 100, max = 5000, message = "Word count must be 100-5000"))]
    pub word_count: Option<usize>,
}

/// Generation response, also used when fetching a stored artifact
#[derive(Debug, Serialize)]
pub struct BlogGenerationResponse {
    /// Always true on the success path
    pub success: bool,

    /// Persisted artifact id; fetch it later via `GET /blogs/{blog_id}`
    pub blog_id: Uuid,

    /// Generated article with imagery
    pub blog: BlogContent,

    /// Keyword analysis payload
    pub keywords: KeywordSet,

    /// Topic analysis payload
    pub analysis: ContentAnalysis,

    /// Word count from the SEO pass
    pub word_count: usize,

    /// SEO score out of 100
    pub seo_score: u32,

    /// Wall-clock processing seconds, two decimal places
    pub processing_time: f64,

    /// When the artifact was persisted
    pub generated_at: DateTime<Utc>,
}

impl From<PipelineOutcome> for BlogGenerationResponse {
    fn from(outcome: PipelineOutcome) -> Self {
        Self {
            success: true,
            blog_id: outcome.artifact_id,
            blog: outcome.blog,
            keywords: outcome.keywords,
            analysis: outcome.analysis,
            word_count: outcome.word_count,
            seo_score: outcome.seo_score,
            processing_time: outcome.processing_time,
            generated_at: outcome.generated_at,
        }
    }
}

impl From<Artifact> for BlogGenerationResponse {
    fn from(artifact: Artifact) -> Self {
        Self {
            success: true,
            blog_id: artifact.id,
            blog: artifact.blog,
            keywords: artifact.keywords,
            analysis: artifact.analysis,
            word_count: artifact.word_count,
            seo_score: artifact.seo_score,
            processing_time: (artifact.processing_time_ms as f64 / 10.0).round() / 100.0,
            generated_at: artifact.generated_at,
        }
    }
}

/// Generate an SEO-scored article from a URL
///
/// Runs the nine-stage pipeline; on success the artifact is persisted for
/// the caller and its id returned in `blog_id`.
///
/// # Errors
///
/// - `400`: validation, extraction, or analysis failed
/// - `401`: missing or invalid bearer token
/// - `500`: generation or post-processing failed (nothing is persisted)
/// - `503`: store unconfigured
pub async fn generate_blog(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<GenerateBlogRequest>,
) -> ApiResult<Json<BlogGenerationResponse>> {
    req.validate().map_err(validation_details)?;
    let pipeline = state.pipeline()?;

    let request = PipelineRequest {
        url: req.url,
        tone: req.tone.unwrap_or_else(|| DEFAULT_TONE.to_string()),
        word_count: req.word_count.unwrap_or(DEFAULT_WORD_COUNT),
    };

    let outcome = pipeline.run(identity.subject_id, &request).await?;

    Ok(Json(outcome.into()))
}

/// Cost estimate request
#[derive(Debug, Deserialize)]
pub struct EstimateCostRequest {
    /// Source URL (echoed back; not fetched)
    pub url: String,

    /// Target word count (default 800)
    pub word_count: Option<usize>,
}

/// Cost estimate response
#[derive(Debug, Serialize)]
pub struct EstimateCostResponse {
    pub url: String,
    pub word_count: usize,
    pub estimated_cost_usd: f64,
    pub provider: String,
    pub model: String,
}

/// Estimate the model cost of generating an article
///
/// Uses average prompt size and a characters-per-word heuristic; no stage
/// is actually invoked.
pub async fn estimate_cost(
    State(state): State<AppState>,
    Json(req): Json<EstimateCostRequest>,
) -> Json<EstimateCostResponse> {
    let word_count = req.word_count.unwrap_or(DEFAULT_WORD_COUNT);

    let prompt_chars = 2000;
    let output_chars = word_count * 6;
    let cost = state.generator.estimate_cost(prompt_chars, output_chars);

    Json(EstimateCostResponse {
        url: req.url,
        word_count,
        estimated_cost_usd: (cost * 10_000.0).round() / 10_000.0,
        provider: "Google Gemini".to_string(),
        model: state.generator.model_name().to_string(),
    })
}
