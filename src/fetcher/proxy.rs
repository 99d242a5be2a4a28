use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::app::{FeedloomError, Result};
use crate::config::ProxyConfig;
use crate::fetcher::Fetcher;

/// Fetches feeds through a CORS proxy (`<base_url>?url=<target>`).
pub struct ProxyFetcher {
    client: Client,
    base_url: Url,
    disable_cache: bool,
}

/// JSON envelope returned by allorigins-style proxies.
#[derive(Debug, Deserialize)]
struct Envelope {
    contents: Option<String>,
    #[serde(default)]
    status: Option<EnvelopeStatus>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeStatus {
    http_code: Option<u16>,
}

impl ProxyFetcher {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            FeedloomError::Config(format!("invalid proxy url {}: {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("feedloom/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedloomError::Config(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            disable_cache: config.disable_cache,
        })
    }

    pub fn proxy_url(&self, target: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            if self.disable_cache {
                query.append_pair("disableCache", "true");
            }
            query.append_pair("url", target);
        }
        url
    }
}

#[async_trait]
impl Fetcher for ProxyFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(self.proxy_url(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedloomError::Network(format!(
                "{} returned {}",
                url, status
            )));
        }

        let body = response.text().await?;
        decode_body(&body)
    }
}

/// Unwrap a proxy response body: either the raw document or a JSON envelope
/// carrying it in `contents`.
pub fn decode_body(body: &str) -> Result<String> {
    if !body.trim_start().starts_with('{') {
        return Ok(body.to_string());
    }

    let Ok(envelope) = serde_json::from_str::<Envelope>(body) else {
        return Ok(body.to_string());
    };

    if let Some(code) = envelope.status.and_then(|s| s.http_code) {
        if !(200..300).contains(&code) {
            return Err(FeedloomError::Network(format!(
                "upstream returned status {}",
                code
            )));
        }
    }

    envelope
        .contents
        .ok_or_else(|| FeedloomError::Network("proxy response has no contents".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(disable_cache: bool) -> ProxyFetcher {
        ProxyFetcher::new(&ProxyConfig {
            base_url: "https://allorigins.hexlet.app/get".into(),
            disable_cache,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_proxy_url_encodes_target() {
        let url = fetcher(true).proxy_url("https://example.com/rss?a=1&b=2");
        assert_eq!(
            url.as_str(),
            "https://allorigins.hexlet.app/get?disableCache=true&url=https%3A%2F%2Fexample.com%2Frss%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn test_proxy_url_without_cache_flag() {
        let url = fetcher(false).proxy_url("https://example.com/rss");
        assert_eq!(
            url.as_str(),
            "https://allorigins.hexlet.app/get?url=https%3A%2F%2Fexample.com%2Frss"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = ProxyFetcher::new(&ProxyConfig {
            base_url: "not a url".into(),
            disable_cache: true,
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(FeedloomError::Config(_))));
    }

    #[test]
    fn test_decode_raw_xml() {
        let body = "<rss><channel><title>T</title></channel></rss>";
        assert_eq!(decode_body(body).unwrap(), body);
    }

    #[test]
    fn test_decode_envelope() {
        let body = r#"{"contents":"<rss></rss>","status":{"url":"https://example.com/rss","http_code":200}}"#;
        assert_eq!(decode_body(body).unwrap(), "<rss></rss>");
    }

    #[test]
    fn test_decode_envelope_without_status() {
        let body = r#"{"contents":"<rss></rss>"}"#;
        assert_eq!(decode_body(body).unwrap(), "<rss></rss>");
    }

    #[test]
    fn test_decode_envelope_upstream_failure() {
        let body = r#"{"contents":null,"status":{"http_code":404}}"#;
        assert!(matches!(
            decode_body(body),
            Err(FeedloomError::Network(_))
        ));
    }

    #[test]
    fn test_decode_envelope_missing_contents() {
        let body = r#"{"contents":null}"#;
        assert!(matches!(
            decode_body(body),
            Err(FeedloomError::Network(_))
        ));
    }
}
