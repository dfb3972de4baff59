/// Topic analysis stage
///
/// Local heuristics over the cleaned text: an extractive summary, a coarse
/// search-intent label, and the dominant topics (bigram frequency, falling
/// back to the primary keywords).

use std::collections::HashMap;

use scribeflow_shared::models::article::ContentAnalysis;

/// Sentences taken into the summary.
const SUMMARY_SENTENCES: usize = 2;

/// Hard cap on summary length in characters.
const SUMMARY_MAX_CHARS: usize = 320;

/// Topics reported per analysis.
const TOPIC_COUNT: usize = 5;

const TRANSACTIONAL_MARKERS: &[&str] =
    &["buy", "price", "pricing", "discount", "order", "checkout", "deal", "shipping"];

const COMMERCIAL_MARKERS: &[&str] =
    &["best", "review", "versus", "compare", "comparison", "top", "alternatives"];

/// Analyzes cleaned text for summary, intent, and topics
#[derive(Debug, Clone, Default)]
pub struct TopicAnalyzer;

impl TopicAnalyzer {
    pub fn new() -> Self {
        TopicAnalyzer
    }

    pub fn analyze(&self, text: &str, title: &str, primary_keywords: &[String]) -> ContentAnalysis {
        let summary = summarize(text);
        let intent = classify_intent(text, title);
        let mut topics = top_bigrams(text, primary_keywords);

        if topics.is_empty() {
            topics = primary_keywords.iter().take(TOPIC_COUNT).cloned().collect();
        }

        ContentAnalysis {
            summary,
            intent,
            topics,
            content_length: text.chars().count(),
        }
    }
}

/// First sentences of the text, bounded by `SUMMARY_MAX_CHARS`
fn summarize(text: &str) -> String {
    let mut summary = String::new();
    let mut sentences = 0;

    for chunk in text.split_inclusive(['.', '!', '?']) {
        if sentences >= SUMMARY_SENTENCES
            || summary.chars().count() + chunk.chars().count() > SUMMARY_MAX_CHARS
        {
            break;
        }
        summary.push_str(chunk);
        sentences += 1;
    }

    if summary.is_empty() {
        summary = text.chars().take(SUMMARY_MAX_CHARS).collect();
    }

    summary.trim().to_string()
}

/// Coarse intent classification from marker words
fn classify_intent(text: &str, title: &str) -> String {
    let haystack = format!("{} {}", title, text).to_lowercase();
    let count = |markers: &[&str]| {
        markers
            .iter()
            .filter(|m| haystack.contains(*m))
            .count()
    };

    let transactional = count(TRANSACTIONAL_MARKERS);
    let commercial = count(COMMERCIAL_MARKERS);

    if transactional >= 2 && transactional >= commercial {
        "transactional".to_string()
    } else if commercial >= 2 {
        "commercial".to_string()
    } else {
        "informational".to_string()
    }
}

/// Most frequent adjacent word pairs built from keyword-bearing tokens
fn top_bigrams(text: &str, primary_keywords: &[String]) -> Vec<String> {
    let tokens: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .map(|t| t.to_lowercase())
        .filter(|t| t.chars().count() >= 3)
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for pair in tokens.windows(2) {
        // Only pairs anchored on a primary keyword are topical.
        if primary_keywords.contains(&pair[0]) || primary_keywords.contains(&pair[1]) {
            *counts.entry(format!("{} {}", pair[0], pair[1])).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().filter(|(_, c)| *c >= 2).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .take(TOPIC_COUNT)
        .map(|(bigram, _)| bigram)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_takes_leading_sentences() {
        let analyzer = TopicAnalyzer::new();
        let text = "First sentence here. Second sentence follows. Third is dropped.";
        let analysis = analyzer.analyze(text, "", &[]);

        assert_eq!(analysis.summary, "First sentence here. Second sentence follows.");
        assert_eq!(analysis.content_length, text.chars().count());
    }

    #[test]
    fn test_intent_defaults_to_informational() {
        let analyzer = TopicAnalyzer::new();
        let analysis = analyzer.analyze("A neutral explanation of a concept.", "Guide", &[]);
        assert_eq!(analysis.intent, "informational");
    }

    #[test]
    fn test_intent_detects_transactional_content() {
        let analyzer = TopicAnalyzer::new();
        let text = "Buy now at a great price with free shipping and an extra discount at checkout.";
        let analysis = analyzer.analyze(text, "Store", &[]);
        assert_eq!(analysis.intent, "transactional");
    }

    #[test]
    fn test_topics_prefer_repeated_keyword_bigrams() {
        let analyzer = TopicAnalyzer::new();
        let text = "rust compiler design. rust compiler internals. rust compiler passes.";
        let keywords = vec!["rust".to_string(), "compiler".to_string()];
        let analysis = analyzer.analyze(text, "", &keywords);

        assert_eq!(analysis.topics[0], "rust compiler");
    }

    #[test]
    fn test_topics_fall_back_to_keywords() {
        let analyzer = TopicAnalyzer::new();
        let keywords = vec!["ownership".to_string()];
        let analysis = analyzer.analyze("Each word appears once only here.", "", &keywords);

        assert_eq!(analysis.topics, vec!["ownership"]);
    }
}
