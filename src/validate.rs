//! Validation of user-submitted feed URLs.

use url::Url;

use crate::app::ValidationReason;

#[derive(Debug, Clone, Default)]
pub struct UrlValidator;

impl UrlValidator {
    pub fn new() -> Self {
        Self
    }

    /// Accept a trimmed, absolute `http`/`https` URL with a host.
    pub fn validate(&self, input: &str) -> Result<Url, ValidationReason> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationReason::Required);
        }

        let url = Url::parse(input).map_err(|_| ValidationReason::InvalidUrl)?;
        match url.scheme() {
            "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
            _ => Err(ValidationReason::InvalidUrl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        let validator = UrlValidator::new();
        assert!(validator.validate("https://example.com/rss").is_ok());
        assert!(validator.validate("  http://example.com/feed.xml  ").is_ok());
    }

    #[test]
    fn test_empty_is_required() {
        let validator = UrlValidator::new();
        assert_eq!(validator.validate(""), Err(ValidationReason::Required));
        assert_eq!(validator.validate("   "), Err(ValidationReason::Required));
    }

    #[test]
    fn test_rejects_non_urls() {
        let validator = UrlValidator::new();
        assert_eq!(
            validator.validate("example"),
            Err(ValidationReason::InvalidUrl)
        );
        assert_eq!(
            validator.validate("ftp://example.com/rss"),
            Err(ValidationReason::InvalidUrl)
        );
        assert_eq!(
            validator.validate("mailto:me@example.com"),
            Err(ValidationReason::InvalidUrl)
        );
    }
}
