/// Text cleaning stage
///
/// Normalizes extracted page text into something the analysis stages can
/// work with: entities decoded, control characters dropped, whitespace
/// collapsed, navigation crumbs filtered out.

/// Cleans extracted page text
#[derive(Debug, Clone, Default)]
pub struct TextCleaner;

/// Lines shorter than this (in characters) are treated as menu/nav noise.
const MIN_LINE_LENGTH: usize = 20;

impl TextCleaner {
    pub fn new() -> Self {
        TextCleaner
    }

    /// Returns cleaned text; empty output means the page had no usable prose
    pub fn clean(&self, raw: &str) -> String {
        let decoded = decode_entities(raw);

        let lines: Vec<String> = decoded
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_control())
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|line| line.chars().count() >= MIN_LINE_LENGTH)
            .collect();

        lines.join("\n")
    }
}

/// Decodes the handful of entities that survive tag stripping
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_and_decodes_entities() {
        let cleaner = TextCleaner::new();
        let raw = "Rust &amp; safety:   systems programming without the footguns.";
        assert_eq!(
            cleaner.clean(raw),
            "Rust & safety: systems programming without the footguns."
        );
    }

    #[test]
    fn test_drops_short_navigation_lines() {
        let cleaner = TextCleaner::new();
        let raw = "Home\nAbout\nA much longer paragraph that clearly carries real content.\nContact";
        let cleaned = cleaner.clean(raw);
        assert_eq!(
            cleaned,
            "A much longer paragraph that clearly carries real content."
        );
    }

    #[test]
    fn test_empty_for_noise_only_input() {
        let cleaner = TextCleaner::new();
        assert!(cleaner.clean("Menu\nLogin\n\n\n").is_empty());
        assert!(cleaner.clean("").is_empty());
    }
}
