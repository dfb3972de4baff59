/// SEO post-processing stage
///
/// Final fatal stage: counts words, tallies keyword usage across the
/// generated article, and produces a score out of 100. An empty article is
/// the only hard failure here.

use std::collections::BTreeMap;

use crate::types::{GeneratedArticle, SeoReport};

/// Tolerated deviation from the target word count, as a fraction.
const WORD_COUNT_TOLERANCE: f64 = 0.25;

/// Meta descriptions inside this range score full marks.
const META_DESCRIPTION_RANGE: std::ops::RangeInclusive<usize> = 50..=160;

/// Scores generated articles
#[derive(Debug, Clone, Default)]
pub struct SeoPostProcessor;

impl SeoPostProcessor {
    pub fn new() -> Self {
        SeoPostProcessor
    }

    /// Analyzes the article against the keyword set and target length
    ///
    /// Returns an error only when the article body is empty — there is
    /// nothing to score or persist.
    pub fn process(
        &self,
        article: &GeneratedArticle,
        keywords: &[String],
        target_word_count: usize,
    ) -> Result<SeoReport, String> {
        let text = article.full_text();
        let word_count = text.split_whitespace().count();

        if word_count == 0 {
            return Err("Generated article is empty".to_string());
        }

        let lower_text = text.to_lowercase();
        let lower_title = article.title.to_lowercase();

        let keyword_matches: BTreeMap<String, usize> = keywords
            .iter()
            .map(|k| (k.clone(), count_occurrences(&lower_text, &k.to_lowercase())))
            .collect();

        // Score components: base 25, keyword coverage 25, title keyword 15,
        // meta description 15, length 20.
        let mut score: u32 = 25;

        if !keywords.is_empty() {
            let used = keyword_matches.values().filter(|&&c| c > 0).count();
            score += ((used as f64 / keywords.len() as f64) * 25.0).round() as u32;
        }

        if keywords
            .iter()
            .any(|k| lower_title.contains(&k.to_lowercase()))
        {
            score += 15;
        }

        if META_DESCRIPTION_RANGE.contains(&article.meta_description.chars().count()) {
            score += 15;
        }

        if target_word_count > 0 {
            let deviation =
                (word_count as f64 - target_word_count as f64).abs() / target_word_count as f64;
            if deviation <= WORD_COUNT_TOLERANCE {
                score += 20;
            } else if deviation <= 2.0 * WORD_COUNT_TOLERANCE {
                score += 10;
            }
        }

        Ok(SeoReport {
            word_count,
            seo_score: score.min(100),
            keyword_matches,
        })
    }
}

/// Non-overlapping occurrence count of `needle` in `haystack`
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribeflow_shared::models::article::ArticleSection;

    fn article(words_per_section: usize, sections: usize) -> GeneratedArticle {
        let body = vec!["rust"; words_per_section].join(" ");
        GeneratedArticle {
            title: "Rust article".to_string(),
            meta_description: "A meta description that is comfortably within the length range."
                .to_string(),
            introduction: "Introduction to rust.".to_string(),
            sections: (0..sections)
                .map(|i| ArticleSection {
                    heading: format!("Section {}", i),
                    content: body.clone(),
                })
                .collect(),
            conclusion: "The end.".to_string(),
        }
    }

    #[test]
    fn test_counts_words_and_keywords() {
        let seo = SeoPostProcessor::new();
        let report = seo
            .process(&article(10, 2), &["rust".to_string()], 30)
            .unwrap();

        assert!(report.word_count > 20);
        assert!(report.keyword_matches["rust"] >= 20);
    }

    #[test]
    fn test_score_rewards_keyword_in_title_and_meta() {
        let seo = SeoPostProcessor::new();
        let report = seo
            .process(&article(10, 2), &["rust".to_string()], 29)
            .unwrap();

        // base 25 + coverage 25 + title 15 + meta 15 + length 20
        assert_eq!(report.seo_score, 100);
    }

    #[test]
    fn test_score_penalizes_missing_keywords() {
        let seo = SeoPostProcessor::new();
        let with = seo
            .process(&article(10, 1), &["rust".to_string()], 19)
            .unwrap();
        let without = seo
            .process(&article(10, 1), &["quantum".to_string()], 19)
            .unwrap();

        assert!(with.seo_score > without.seo_score);
    }

    #[test]
    fn test_empty_article_fails() {
        let seo = SeoPostProcessor::new();
        let empty = GeneratedArticle {
            title: String::new(),
            meta_description: String::new(),
            introduction: String::new(),
            sections: vec![],
            conclusion: String::new(),
        };

        assert!(seo.process(&empty, &[], 800).is_err());
    }

    #[test]
    fn test_score_is_capped_at_100() {
        let seo = SeoPostProcessor::new();
        let report = seo
            .process(&article(15, 2), &["rust".to_string()], 40)
            .unwrap();
        assert!(report.seo_score <= 100);
    }
}
