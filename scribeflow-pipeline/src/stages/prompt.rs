/// Prompt construction stage
///
/// Folds the extraction and analysis results into one generation prompt.
/// The prompt asks the model for a JSON article document so the generator
/// can parse the response without scraping prose.

use scribeflow_shared::models::article::{ContentAnalysis, KeywordSet};

/// Inputs gathered by the earlier stages
#[derive(Debug, Clone)]
pub struct PromptInputs<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub keywords: &'a KeywordSet,
    pub analysis: &'a ContentAnalysis,
    pub tone: &'a str,
    pub word_count: usize,
}

/// Builds generation prompts
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        PromptBuilder
    }

    pub fn build(&self, inputs: &PromptInputs<'_>) -> String {
        let primary = inputs.keywords.primary_keywords.join(", ");
        let secondary = inputs.keywords.secondary_keywords.join(", ");
        let topics = inputs.analysis.topics.join(", ");

        format!(
            "Write an SEO-optimized blog article of about {word_count} words in a {tone} tone.\n\
             \n\
             Source page: {url}\n\
             Source title: {title}\n\
             Source summary: {summary}\n\
             Search intent: {intent}\n\
             Topics to cover: {topics}\n\
             Primary keywords (use naturally, especially in headings): {primary}\n\
             Secondary keywords: {secondary}\n\
             \n\
             Respond with a single JSON object and nothing else, using exactly these keys:\n\
             {{\n\
               \"title\": string,\n\
               \"meta_description\": string (under 160 characters),\n\
               \"introduction\": string,\n\
               \"sections\": [{{\"heading\": string, \"content\": string}}],\n\
               \"conclusion\": string\n\
             }}",
            word_count = inputs.word_count,
            tone = inputs.tone,
            url = inputs.url,
            title = inputs.title,
            summary = inputs.analysis.summary,
            intent = inputs.analysis.intent,
            topics = topics,
            primary = primary,
            secondary = secondary,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_all_inputs() {
        let keywords = KeywordSet {
            primary_keywords: vec!["rust".to_string(), "async".to_string()],
            secondary_keywords: vec!["tokio".to_string()],
            keyword_density: Default::default(),
        };
        let analysis = ContentAnalysis {
            summary: "A summary.".to_string(),
            intent: "informational".to_string(),
            topics: vec!["rust async".to_string()],
            content_length: 100,
        };

        let prompt = PromptBuilder::new().build(&PromptInputs {
            url: "https://example.com",
            title: "Async Rust",
            keywords: &keywords,
            analysis: &analysis,
            tone: "informative",
            word_count: 800,
        });

        for needle in [
            "800 words",
            "informative tone",
            "https://example.com",
            "Async Rust",
            "rust, async",
            "tokio",
            "informational",
            "\"meta_description\"",
        ] {
            assert!(prompt.contains(needle), "prompt missing {:?}", needle);
        }
    }
}
