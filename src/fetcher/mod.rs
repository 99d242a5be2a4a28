pub mod proxy;

#[cfg(test)]
pub(crate) mod stub;

use async_trait::async_trait;

use crate::app::Result;

pub use proxy::ProxyFetcher;

/// Retrieves the text of a feed document.
///
/// Failures to reach the source, and non-success statuses, are
/// [`FeedloomError::Network`](crate::app::FeedloomError::Network).
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}
