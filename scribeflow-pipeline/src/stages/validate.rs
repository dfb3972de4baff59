/// URL validation stage
///
/// First stage of the pipeline; rejects anything that is not a plausible
/// public http(s) URL before any network call happens.

/// Validates request URLs
#[derive(Debug, Clone, Default)]
pub struct UrlValidator;

/// Upper bound on accepted URL length
const MAX_URL_LENGTH: usize = 2048;

impl UrlValidator {
    pub fn new() -> Self {
        UrlValidator
    }

    /// Checks that `url` is a usable http(s) URL
    ///
    /// Returns a short human-readable reason on rejection.
    pub fn validate(&self, url: &str) -> Result<(), String> {
        let url = url.trim();

        if url.is_empty() {
            return Err("URL must not be empty".to_string());
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(format!("URL exceeds {} characters", MAX_URL_LENGTH));
        }

        if url.chars().any(char::is_whitespace) {
            return Err("URL must not contain whitespace".to_string());
        }

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| "URL scheme must be http or https".to_string())?;

        let host = rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .split('@')
            .last()
            .unwrap_or_default()
            .split(':')
            .next()
            .unwrap_or_default();

        if host.is_empty() {
            return Err("URL is missing a host".to_string());
        }

        if host != "localhost" && !host.contains('.') {
            return Err("URL host is not a valid domain".to_string());
        }

        if host.starts_with('.') || host.ends_with('.') {
            return Err("URL host is not a valid domain".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_urls() {
        let v = UrlValidator::new();
        assert!(v.validate("https://example.com").is_ok());
        assert!(v.validate("http://example.com/path?q=1#frag").is_ok());
        assert!(v.validate("https://sub.domain.example.com:8443/a/b").is_ok());
        assert!(v.validate("http://localhost:8000/dev").is_ok());
    }

    #[test]
    fn test_rejects_non_urls() {
        let v = UrlValidator::new();
        assert!(v.validate("not-a-url").is_err());
        assert!(v.validate("").is_err());
        assert!(v.validate("ftp://example.com").is_err());
        assert!(v.validate("example.com").is_err());
        assert!(v.validate("https://").is_err());
        assert!(v.validate("https://nodomain").is_err());
        assert!(v.validate("https://bad host.com").is_err());
        assert!(v.validate("https://.example.com").is_err());
    }

    #[test]
    fn test_rejects_oversized_urls() {
        let v = UrlValidator::new();
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(v.validate(&url).is_err());
    }
}
