use std::sync::Arc;

use tracing::{info, warn};

use crate::app::{FeedloomError, Result, ValidationReason};
use crate::domain::{Feed, FeedKey};
use crate::fetcher::Fetcher;
use crate::notifier::ChangeNotifier;
use crate::parser::RssParser;
use crate::validate::UrlValidator;
use crate::view::{Feedback, ViewRenderer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub feed: Feed,
    pub added: usize,
}

/// Handles a URL typed into the subscription form.
///
/// Nothing is stored unless the whole chain (validate, uniqueness, fetch,
/// parse) succeeds; then the feed and its posts are added back to back.
pub struct SubmissionController {
    validator: UrlValidator,
    parser: RssParser,
    notifier: Arc<ChangeNotifier>,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    renderer: Arc<ViewRenderer>,
}

impl SubmissionController {
    pub fn new(
        validator: UrlValidator,
        parser: RssParser,
        notifier: Arc<ChangeNotifier>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        renderer: Arc<ViewRenderer>,
    ) -> Self {
        Self {
            validator,
            parser,
            notifier,
            fetcher,
            renderer,
        }
    }

    /// Submit `input` and report the outcome in the feedback region.
    pub async fn submit(&self, input: &str) -> Result<SubmissionOutcome> {
        let result = self.try_submit(input).await;

        match &result {
            Ok(outcome) => {
                info!(
                    "Subscribed to {} ({} posts)",
                    outcome.feed.url, outcome.added
                );
                self.renderer.show_feedback(&Feedback::Success);
            }
            Err(e) => {
                warn!("Submission of {:?} failed: {}", input.trim(), e);
                self.renderer.show_feedback(&Feedback::Error {
                    message_key: e.message_key(),
                });
            }
        }

        result
    }

    async fn try_submit(&self, input: &str) -> Result<SubmissionOutcome> {
        let url = self
            .validator
            .validate(input)
            .map_err(FeedloomError::Validation)?;
        let key = FeedKey::from_url(&url)
            .ok_or(FeedloomError::Validation(ValidationReason::InvalidUrl))?;

        self.notifier.check_unique(&key)?;

        let body = self.fetcher.fetch(url.as_str()).await?;
        let parsed = self.parser.parse(url.as_str(), &body)?;

        // A concurrent submission for the same host may have won while we
        // were fetching; add_feed re-checks and fails before any posts land.
        let feed = self.notifier.add_feed(Feed {
            url: url.to_string(),
            key,
            title: parsed.title,
            description: parsed.description,
            link: parsed.link,
        })?;
        let added = self.notifier.add_posts(parsed.posts);

        Ok(SubmissionOutcome { feed, added })
    }
}
