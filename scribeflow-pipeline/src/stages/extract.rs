/// Content extraction stage
///
/// Fetches the source page over HTTP and strips it down to its title and
/// visible text. Script, style, and template blocks are removed before tag
/// stripping so their contents never leak into the analysis stages.

use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;

use super::{ContentExtractor, StageError, StageResult};
use crate::types::ExtractedContent;

/// HTTP-backed content extractor
pub struct HttpExtractor {
    client: reqwest::Client,
    max_content_length: usize,
    title_re: Regex,
    block_re: Regex,
    tag_re: Regex,
}

impl HttpExtractor {
    /// Creates an extractor with a per-request timeout and a cap on the
    /// amount of text handed to the analysis stages
    pub fn new(timeout: Duration, max_content_length: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("scribeflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            max_content_length,
            title_re: Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("static regex"),
            block_re: Regex::new(
                r"(?is)<script[^>]*>.*?</script>|<style[^>]*>.*?</style>|<noscript[^>]*>.*?</noscript>|<template[^>]*>.*?</template>",
            )
            .expect("static regex"),
            tag_re: Regex::new(r"(?s)<[^>]+>").expect("static regex"),
        }
    }

    /// Strips markup from an HTML document, returning (title, text)
    fn strip_html(&self, html: &str) -> (String, String) {
        let title = self
            .title_re
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();

        let without_blocks = self.block_re.replace_all(html, " ");
        // Block-level closers become line breaks so the cleaner can filter
        // per line.
        let with_breaks = without_blocks
            .replace("</p>", "\n")
            .replace("</div>", "\n")
            .replace("</li>", "\n")
            .replace("</h1>", "\n")
            .replace("</h2>", "\n")
            .replace("</h3>", "\n")
            .replace("<br>", "\n")
            .replace("<br/>", "\n")
            .replace("<br />", "\n");
        let text = self.tag_re.replace_all(&with_breaks, " ");

        (title, text.into_owned())
    }
}

#[async_trait]
impl ContentExtractor for HttpExtractor {
    async fn extract(&self, url: &str) -> StageResult<ExtractedContent> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StageError::new(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StageError::new(format!(
                "Source returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StageError::new(format!("Failed to read response body: {}", e)))?;

        let (title, mut text) = self.strip_html(&body);

        if text.chars().count() > self.max_content_length {
            text = text.chars().take(self.max_content_length).collect();
        }

        if text.trim().is_empty() {
            return Err(StageError::new("Page contained no extractable text"));
        }

        tracing::debug!(
            url = %url,
            title = %title,
            chars = text.chars().count(),
            "Extracted page content"
        );

        Ok(ExtractedContent { title, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> HttpExtractor {
        HttpExtractor::new(Duration::from_secs(5), 10_000)
    }

    #[test]
    fn test_strip_html_removes_scripts_and_tags() {
        let html = r#"<html><head><title>A  Page</title>
            <script>var x = "never shown";</script>
            <style>body { color: red; }</style></head>
            <body><h1>Heading</h1><p>Paragraph one.</p><p>Paragraph two.</p></body></html>"#;

        let (title, text) = extractor().strip_html(html);

        assert_eq!(title, "A Page");
        assert!(text.contains("Paragraph one."));
        assert!(text.contains("Paragraph two."));
        assert!(!text.contains("never shown"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_strip_html_without_title() {
        let (title, text) = extractor().strip_html("<body><p>Just text.</p></body>");
        assert!(title.is_empty());
        assert!(text.contains("Just text."));
    }

    #[test]
    fn test_block_closers_become_line_breaks() {
        let (_, text) = extractor().strip_html("<p>First block.</p><p>Second block.</p>");
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["First block.", "Second block."]);
    }
}
