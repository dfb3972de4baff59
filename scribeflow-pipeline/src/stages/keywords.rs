/// Keyword extraction stage
///
/// Local frequency analysis over the cleaned text: the top-ranked terms
/// become primary keywords (with density percentages), the next tier
/// secondary. No external calls.

use std::collections::{BTreeMap, HashMap};

use scribeflow_shared::models::article::KeywordSet;

/// How many top-ranked terms count as primary keywords.
const PRIMARY_COUNT: usize = 5;

/// How many terms after the primary tier count as secondary.
const SECONDARY_COUNT: usize = 10;

/// Minimum token length considered a keyword candidate.
const MIN_TOKEN_LENGTH: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "her", "was", "one", "our",
    "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "now", "old", "see",
    "two", "way", "who", "did", "yes", "about", "after", "also", "been", "before", "being",
    "between", "both", "each", "from", "have", "here", "into", "just", "like", "make", "more",
    "most", "much", "only", "other", "over", "some", "such", "than", "that", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "under", "very", "were",
    "what", "when", "where", "which", "while", "will", "with", "would", "your", "yours",
    "because", "could", "should", "might", "every", "using", "used", "use",
];

/// Extracts and ranks keywords from cleaned text
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    pub fn new() -> Self {
        KeywordExtractor
    }

    /// Ranks keyword candidates by frequency
    ///
    /// Returns an error when the text contains no keyword candidates at all;
    /// generation cannot be steered without them.
    pub fn extract(&self, text: &str) -> Result<KeywordSet, String> {
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .map(|t| t.to_lowercase())
            .filter(|t| {
                t.chars().count() >= MIN_TOKEN_LENGTH
                    && !t.chars().all(|c| c.is_numeric())
                    && !STOPWORDS.contains(&t.as_str())
            })
            .collect();

        if tokens.is_empty() {
            return Err("No keyword candidates in content".to_string());
        }

        let total = tokens.len();
        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        for token in &tokens {
            *frequencies.entry(token.as_str()).or_default() += 1;
        }

        // Rank by frequency, alphabetical on ties for determinism.
        let mut ranked: Vec<(&str, usize)> = frequencies.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        let primary_keywords: Vec<String> = ranked
            .iter()
            .take(PRIMARY_COUNT)
            .map(|(t, _)| t.to_string())
            .collect();

        let secondary_keywords: Vec<String> = ranked
            .iter()
            .skip(PRIMARY_COUNT)
            .take(SECONDARY_COUNT)
            .map(|(t, _)| t.to_string())
            .collect();

        let keyword_density: BTreeMap<String, f64> = ranked
            .iter()
            .take(PRIMARY_COUNT)
            .map(|(t, count)| {
                let density = (*count as f64 / total as f64) * 100.0;
                (t.to_string(), (density * 100.0).round() / 100.0)
            })
            .collect();

        Ok(KeywordSet {
            primary_keywords,
            secondary_keywords,
            keyword_density,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_by_frequency() {
        let extractor = KeywordExtractor::new();
        let text = "rust rust rust compiler compiler borrow checker safety";

        let set = extractor.extract(text).unwrap();

        assert_eq!(set.primary_keywords[0], "rust");
        assert_eq!(set.primary_keywords[1], "compiler");
        assert!(set.primary_keywords.contains(&"borrow".to_string()));
    }

    #[test]
    fn test_filters_stopwords_and_short_tokens() {
        let extractor = KeywordExtractor::new();
        let text = "the and for is a rust rust programming";

        let set = extractor.extract(text).unwrap();

        assert!(!set.primary_keywords.contains(&"the".to_string()));
        assert!(!set.primary_keywords.contains(&"and".to_string()));
        assert!(set.primary_keywords.contains(&"rust".to_string()));
    }

    #[test]
    fn test_density_sums_reasonably() {
        let extractor = KeywordExtractor::new();
        let set = extractor.extract("alpha alpha beta gamma").unwrap();

        assert_eq!(set.keyword_density["alpha"], 50.0);
        assert_eq!(set.keyword_density["beta"], 25.0);
    }

    #[test]
    fn test_errors_on_empty_candidates() {
        let extractor = KeywordExtractor::new();
        assert!(extractor.extract("").is_err());
        assert!(extractor.extract("a of to 12 99").is_err());
    }

    #[test]
    fn test_tiers_are_disjoint() {
        let extractor = KeywordExtractor::new();
        let words: Vec<String> = (0..20).map(|i| format!("keyword{:02}", i)).collect();
        let set = extractor.extract(&words.join(" ")).unwrap();

        assert_eq!(set.primary_keywords.len(), 5);
        assert_eq!(set.secondary_keywords.len(), 10);
        for k in &set.primary_keywords {
            assert!(!set.secondary_keywords.contains(k));
        }
    }
}
