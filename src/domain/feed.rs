use serde::{Deserialize, Serialize};
use url::Url;

/// Identity of a feed: its normalized host.
///
/// Two feeds served from the same origin are the same subscription, no
/// matter which path they were submitted with. Normalization lowercases the
/// host, drops a trailing dot and a leading `www.`, and keeps an explicit
/// non-default port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedKey(String);

impl FeedKey {
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?.trim_end_matches('.').to_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
        if host.is_empty() {
            return None;
        }

        let key = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host,
        };
        Some(Self(key))
    }

    pub fn parse(url: &str) -> Option<Self> {
        Url::parse(url).ok().as_ref().and_then(Self::from_url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FeedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    /// URL the feed was submitted with; re-polled as-is.
    pub url: String,
    pub key: FeedKey,
    pub title: String,
    pub description: String,
    /// `channel > link` of the source document.
    pub link: Option<String>,
}

impl Feed {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_path_and_scheme() {
        let a = FeedKey::parse("https://example.com/rss").unwrap();
        let b = FeedKey::parse("http://example.com/other/feed.xml").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "example.com");
    }

    #[test]
    fn test_key_normalizes_case_and_www() {
        let a = FeedKey::parse("https://WWW.Example.COM./feed").unwrap();
        assert_eq!(a.as_str(), "example.com");
    }

    #[test]
    fn test_key_keeps_explicit_port() {
        let a = FeedKey::parse("http://localhost:8080/rss").unwrap();
        let b = FeedKey::parse("http://localhost/rss").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "localhost:8080");
    }

    #[test]
    fn test_key_rejects_hostless_url() {
        assert!(FeedKey::parse("mailto:someone@example.com").is_none());
        assert!(FeedKey::parse("not a url").is_none());
    }

    #[test]
    fn test_display_title_falls_back_to_url() {
        let feed = Feed {
            url: "https://example.com/rss".into(),
            key: FeedKey::parse("https://example.com/rss").unwrap(),
            title: String::new(),
            description: String::new(),
            link: None,
        };
        assert_eq!(feed.display_title(), "https://example.com/rss");
    }
}
