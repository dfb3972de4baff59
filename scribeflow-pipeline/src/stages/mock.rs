/// Mock stage collaborators for tests and demos
///
/// Deterministic implementations of the external-call traits. Each mock
/// counts its invocations so tests can assert not just outcomes but call
/// ordering properties (e.g. a failed validation performs zero downstream
/// calls), and each can be switched into a failing mode.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ArticleGenerator, ContentExtractor, ImageFetcher, StageError, StageResult};
use crate::types::{ExtractedContent, GeneratedArticle};
use scribeflow_shared::models::article::{ArticleSection, ImageData};

/// Default page text returned by [`MockExtractor`]
///
/// Long enough to survive cleaning and yield a stable keyword ranking.
const SAMPLE_TEXT: &str = "\
Rust programming delivers memory safety without garbage collection overhead.\n\
Rust programming pairs zero cost abstractions with fearless concurrency patterns.\n\
The async runtime ecosystem around tokio makes network services pleasant to build.\n\
Developers adopt rust for reliable infrastructure, tooling, and embedded targets.\n\
The compiler guides developers toward correct ownership and borrowing decisions.\n";

/// Deterministic content extractor
#[derive(Default)]
pub struct MockExtractor {
    should_fail: bool,
    text: Option<String>,
    calls: AtomicUsize,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor that fails every call
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Extractor returning custom page text
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Number of `extract` calls observed
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentExtractor for MockExtractor {
    async fn extract(&self, _url: &str) -> StageResult<ExtractedContent> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(StageError::new("mock extraction failure"));
        }

        Ok(ExtractedContent {
            title: "Sample Page".to_string(),
            text: self.text.clone().unwrap_or_else(|| SAMPLE_TEXT.to_string()),
        })
    }
}

/// Deterministic article generator
pub struct MockGenerator {
    should_fail: bool,
    target_words: usize,
    calls: AtomicUsize,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self {
            should_fail: false,
            target_words: 800,
            calls: AtomicUsize::new(0),
        }
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator that fails every call
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Generator targeting a specific article length
    pub fn with_target_words(target_words: usize) -> Self {
        Self {
            target_words,
            ..Self::default()
        }
    }

    /// Number of `generate` calls observed
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Deterministic filler prose of roughly `words` words
fn filler(words: usize) -> String {
    const VOCAB: &[&str] = &[
        "rust", "delivers", "reliable", "async", "services", "with", "predictable",
        "performance", "and", "strong", "compile", "time", "guarantees", "for", "teams",
    ];

    (0..words)
        .map(|i| VOCAB[i % VOCAB.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl ArticleGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str) -> StageResult<GeneratedArticle> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(StageError::new("mock generation failure"));
        }

        let section_words = self.target_words / 5;

        Ok(GeneratedArticle {
            title: "Why Rust Keeps Winning Over Infrastructure Teams".to_string(),
            meta_description:
                "How Rust combines memory safety, speed, and a mature async ecosystem."
                    .to_string(),
            introduction: filler(section_words),
            sections: vec![
                ArticleSection {
                    heading: "Memory Safety Without a Garbage Collector".to_string(),
                    content: filler(section_words),
                },
                ArticleSection {
                    heading: "Async Services on Tokio".to_string(),
                    content: filler(section_words),
                },
                ArticleSection {
                    heading: "Tooling the Ecosystem Got Right".to_string(),
                    content: filler(section_words),
                },
            ],
            conclusion: filler(section_words),
        })
    }

    fn estimate_cost(&self, prompt_chars: usize, output_chars: usize) -> f64 {
        (prompt_chars + output_chars) as f64 * 1e-7
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Deterministic image fetcher
#[derive(Default)]
pub struct MockImageFetcher {
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher that fails every call
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Number of fetch calls observed (featured + section)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn image(&self, index: usize, keywords: &[String]) -> ImageData {
        ImageData {
            url: format!("https://images.example.com/photo-{}.jpg", index),
            thumb_url: Some(format!("https://images.example.com/thumb-{}.jpg", index)),
            photographer: Some("Mock Photographer".to_string()),
            alt_text: keywords.first().cloned().unwrap_or_else(|| "photo".to_string()),
        }
    }
}

#[async_trait]
impl ImageFetcher for MockImageFetcher {
    async fn featured_image(&self, keywords: &[String]) -> StageResult<Option<ImageData>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(StageError::new("mock image failure"));
        }

        Ok(Some(self.image(0, keywords)))
    }

    async fn section_images(
        &self,
        keywords: &[String],
        count: usize,
    ) -> StageResult<Vec<ImageData>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(StageError::new("mock image failure"));
        }

        Ok((1..=count).map(|i| self.image(i, keywords)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_extractor_counts_calls() {
        let extractor = MockExtractor::new();
        assert_eq!(extractor.calls(), 0);

        extractor.extract("https://example.com").await.unwrap();
        extractor.extract("https://example.com").await.unwrap();

        assert_eq!(extractor.calls(), 2);
    }

    #[tokio::test]
    async fn test_mock_generator_hits_target_length() {
        let generator = MockGenerator::with_target_words(800);
        let article = generator.generate("prompt").await.unwrap();

        let words = article.full_text().split_whitespace().count();
        assert!(words >= 600 && words <= 1000, "got {} words", words);
    }

    #[tokio::test]
    async fn test_failing_mocks_fail() {
        assert!(MockExtractor::failing().extract("u").await.is_err());
        assert!(MockGenerator::failing().generate("p").await.is_err());
        assert!(MockImageFetcher::failing().featured_image(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_images_are_deterministic() {
        let fetcher = MockImageFetcher::new();
        let keywords = vec!["rust".to_string()];

        let featured = fetcher.featured_image(&keywords).await.unwrap().unwrap();
        assert_eq!(featured.alt_text, "rust");

        let images = fetcher.section_images(&keywords, 3).await.unwrap();
        assert_eq!(images.len(), 3);
        assert_eq!(fetcher.calls(), 2);
    }
}
