/// Generated article content types
///
/// These are the document payloads produced by the generation pipeline and
/// embedded in persisted artifacts: the article body itself, the keyword
/// analysis that steered it, the topic analysis, and fetched imagery.

use serde::{Deserialize, Serialize};

/// One body section of a generated article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSection {
    /// Section heading
    pub heading: String,

    /// Section body text
    pub content: String,
}

/// An image attached to an article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    /// Full-size image URL
    pub url: String,

    /// Thumbnail URL, when the provider supplies one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,

    /// Attribution (photographer / source account)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photographer: Option<String>,

    /// Alt text derived from the search keywords
    pub alt_text: String,
}

/// The generated article document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogContent {
    /// Article title
    pub title: String,

    /// SEO meta description
    pub meta_description: String,

    /// Opening paragraph(s)
    pub introduction: String,

    /// Body sections in order
    pub sections: Vec<ArticleSection>,

    /// Closing paragraph
    pub conclusion: String,

    /// Hero image, when the image stage produced one
    pub featured_image: Option<ImageData>,

    /// Supplementary images for body sections
    #[serde(default)]
    pub additional_images: Vec<ImageData>,
}

impl BlogContent {
    /// Full article text in reading order, used for word counting
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

    /// Whitespace-delimited word count over the full article text
    pub fn word_count(&self) -> usize {
        self.full_text().split_whitespace().count()
    }
}

/// Keyword analysis payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet {
    /// Highest-signal keywords, most frequent first
    pub primary_keywords: Vec<String>,

    /// Second-tier keywords
    pub secondary_keywords: Vec<String>,

    /// Keyword -> density percentage over the source text
    pub keyword_density: std::collections::BTreeMap<String, f64>,
}

impl KeywordSet {
    /// Primary followed by secondary keywords, in rank order
    pub fn all_keywords(&self) -> Vec<String> {
        self.primary_keywords
            .iter()
            .chain(self.secondary_keywords.iter())
            .cloned()
            .collect()
    }
}

/// Topic analysis payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    /// Short extractive summary of the source content
    pub summary: String,

    /// Inferred search intent (informational, commercial, transactional)
    pub intent: String,

    /// Dominant topics
    pub topics: Vec<String>,

    /// Character length of the cleaned source text
    pub content_length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_blog() -> BlogContent {
        BlogContent {
            title: "Testing in Rust".to_string(),
            meta_description: "A short guide".to_string(),
            introduction: "Testing matters.".to_string(),
            sections: vec![ArticleSection {
                heading: "Unit tests".to_string(),
                content: "Write them close to the code.".to_string(),
            }],
            conclusion: "Ship with confidence.".to_string(),
            featured_image: None,
            additional_images: vec![],
        }
    }

    #[test]
    fn test_word_count_covers_all_parts() {
        let blog = sample_blog();
        // 3 + 2 + 2 + 6 + 3
        assert_eq!(blog.word_count(), 16);
    }

    #[test]
    fn test_blog_content_json_roundtrip() {
        let blog = sample_blog();
        let json = serde_json::to_value(&blog).unwrap();
        let back: BlogContent = serde_json::from_value(json).unwrap();
        assert_eq!(back, blog);
    }

    #[test]
    fn test_all_keywords_preserves_rank_order() {
        let set = KeywordSet {
            primary_keywords: vec!["rust".to_string(), "testing".to_string()],
            secondary_keywords: vec!["cargo".to_string()],
            keyword_density: Default::default(),
        };

        assert_eq!(set.all_keywords(), vec!["rust", "testing", "cargo"]);
    }
}
