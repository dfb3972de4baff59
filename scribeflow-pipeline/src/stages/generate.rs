/// Article generation stage
///
/// The external language-model call. `GeminiGenerator` talks to the Google
/// Generative Language API; the response is expected to be the JSON article
/// document the prompt asks for, with a plain-text fallback when the model
/// ignores the format instruction.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{ArticleGenerator, StageError, StageResult};
use crate::types::GeneratedArticle;
use scribeflow_shared::models::article::ArticleSection;

/// USD per 1k prompt characters (flash-tier pricing, rough)
const INPUT_COST_PER_1K_CHARS: f64 = 0.000_075;

/// USD per 1k output characters
const OUTPUT_COST_PER_1K_CHARS: f64 = 0.000_30;

/// Gemini-backed article generator
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    /// Overrides the API base URL (tests point this at a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[async_trait]
impl ArticleGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> StageResult<GeneratedArticle> {
        if self.api_key.is_empty() {
            return Err(StageError::new("Model API key is not configured"));
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| StageError::new(format!("Model request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StageError::new(format!(
                "Model returned HTTP {}",
                status.as_u16()
            )));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| StageError::new(format!("Model response was not JSON: {}", e)))?;

        let text = payload
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| StageError::new("Model returned no candidates"))?;

        parse_article(&text)
    }

    fn estimate_cost(&self, prompt_chars: usize, output_chars: usize) -> f64 {
        (prompt_chars as f64 / 1000.0) * INPUT_COST_PER_1K_CHARS
            + (output_chars as f64 / 1000.0) * OUTPUT_COST_PER_1K_CHARS
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Parses the model's reply into an article document
///
/// Accepts the requested JSON object (optionally wrapped in a markdown code
/// fence); anything else is kept as a single-section article rather than
/// failing the run.
fn parse_article(text: &str) -> StageResult<GeneratedArticle> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    if let Ok(article) = serde_json::from_str::<GeneratedArticle>(unfenced) {
        if article.title.is_empty() {
            return Err(StageError::new("Model article is missing a title"));
        }
        return Ok(article);
    }

    // Fallback: keep the prose as one section.
    let mut lines = unfenced.lines().filter(|l| !l.trim().is_empty());
    let title = lines
        .next()
        .map(|l| l.trim_start_matches('#').trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| StageError::new("Model returned an empty article"))?;
    let rest: String = lines.collect::<Vec<_>>().join("\n");

    Ok(GeneratedArticle {
        title: title.clone(),
        meta_description: title,
        introduction: String::new(),
        sections: vec![ArticleSection {
            heading: "Overview".to_string(),
            content: rest,
        }],
        conclusion: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_article_json() {
        let text = r#"{"title":"T","meta_description":"M","introduction":"I",
            "sections":[{"heading":"H","content":"C"}],"conclusion":"E"}"#;

        let article = parse_article(text).unwrap();
        assert_eq!(article.title, "T");
        assert_eq!(article.sections.len(), 1);
    }

    #[test]
    fn test_parse_article_fenced_json() {
        let text = "```json\n{\"title\":\"T\",\"meta_description\":\"M\",\"introduction\":\"I\",\"sections\":[],\"conclusion\":\"E\"}\n```";

        let article = parse_article(text).unwrap();
        assert_eq!(article.title, "T");
    }

    #[test]
    fn test_parse_article_prose_fallback() {
        let article = parse_article("# My Title\n\nBody line one.\nBody line two.").unwrap();

        assert_eq!(article.title, "My Title");
        assert_eq!(article.sections.len(), 1);
        assert!(article.sections[0].content.contains("Body line one."));
    }

    #[test]
    fn test_parse_article_empty_reply() {
        assert!(parse_article("").is_err());
        assert!(parse_article("   \n  ").is_err());
    }

    #[test]
    fn test_estimate_cost_scales_with_size() {
        let generator =
            GeminiGenerator::new("key", "gemini-test", Duration::from_secs(5));

        let small = generator.estimate_cost(1_000, 1_000);
        let large = generator.estimate_cost(10_000, 10_000);

        assert!(small > 0.0);
        assert!((large / small - 10.0).abs() < 1e-9);
    }
}
