//! Change notification around the [`FeedStore`].
//!
//! Every mutation goes through [`ChangeNotifier`], which applies it under a
//! lock and then publishes exactly one [`Change`] on a broadcast channel if
//! the store actually changed. A batch of posts is one `posts-changed`
//! event no matter how many posts it carried.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::debug;

use crate::app::Result;
use crate::domain::{Feed, FeedKey, Post};
use crate::store::{FeedStore, StoreSnapshot};

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    FeedsChanged,
    PostsChanged,
    ReadChanged,
    PreviewChanged,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::FeedsChanged => "feeds-changed",
            ChangeKind::PostsChanged => "posts-changed",
            ChangeKind::ReadChanged => "read-changed",
            ChangeKind::PreviewChanged => "preview-changed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    FeedsChanged,
    PostsChanged { added: usize },
    ReadChanged { post_id: String },
    PreviewChanged { post_id: Option<String> },
}

impl Change {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::FeedsChanged => ChangeKind::FeedsChanged,
            Change::PostsChanged { .. } => ChangeKind::PostsChanged,
            Change::ReadChanged { .. } => ChangeKind::ReadChanged,
            Change::PreviewChanged { .. } => ChangeKind::PreviewChanged,
        }
    }
}

pub struct ChangeNotifier {
    store: Mutex<FeedStore>,
    tx: broadcast::Sender<Change>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(FeedStore::new())
    }
}

impl ChangeNotifier {
    pub fn new(store: FeedStore) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            store: Mutex::new(store),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.tx.subscribe()
    }

    // Store operations never panic halfway, so a poisoned lock still guards
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, FeedStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Called with the lock held so events leave in mutation order.
    fn emit(&self, change: Change) {
        debug!("{}: {:?}", change.kind().as_str(), change);
        // No subscribers is fine.
        let _ = self.tx.send(change);
    }

    pub fn add_feed(&self, feed: Feed) -> Result<Feed> {
        let mut store = self.lock();
        let feed = store.add_feed(feed)?;
        self.emit(Change::FeedsChanged);
        Ok(feed)
    }

    pub fn add_posts(&self, posts: Vec<Post>) -> usize {
        let mut store = self.lock();
        let added = store.add_posts(posts);
        if added > 0 {
            self.emit(Change::PostsChanged { added });
        }
        added
    }

    pub fn refresh_feed(&self, url: &str, title: &str, description: &str) -> bool {
        let mut store = self.lock();
        let changed = store.refresh_feed(url, title, description);
        if changed {
            self.emit(Change::FeedsChanged);
        }
        changed
    }

    pub fn mark_read(&self, post_id: &str) -> bool {
        let mut store = self.lock();
        let changed = store.mark_read(post_id);
        if changed {
            self.emit(Change::ReadChanged {
                post_id: post_id.to_string(),
            });
        }
        changed
    }

    pub fn set_preview(&self, post_id: &str) -> Result<()> {
        let mut store = self.lock();
        if store.set_preview(post_id)? {
            self.emit(Change::PreviewChanged {
                post_id: Some(post_id.to_string()),
            });
        }
        Ok(())
    }

    pub fn clear_preview(&self) -> bool {
        let mut store = self.lock();
        let changed = store.clear_preview();
        if changed {
            self.emit(Change::PreviewChanged { post_id: None });
        }
        changed
    }

    // Queries

    pub fn check_unique(&self, key: &FeedKey) -> Result<()> {
        self.lock().check_unique(key)
    }

    pub fn feeds(&self) -> Vec<Feed> {
        self.lock().feeds().to_vec()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.lock().posts().to_vec()
    }

    pub fn is_read(&self, post_id: &str) -> bool {
        self.lock().is_read(post_id)
    }

    pub fn unread_count(&self, feed_url: &str) -> usize {
        self.lock().unread_count(feed_url)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FeedloomError;
    use crate::store::tests::{feed, post};
    use tokio::sync::broadcast::error::TryRecvError;

    const URL: &str = "https://example.com/rss";

    fn drain(rx: &mut broadcast::Receiver<Change>) -> Vec<Change> {
        let mut changes = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(change) => changes.push(change),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
        changes
    }

    #[test]
    fn test_feed_then_posts_emit_two_events() {
        let notifier = ChangeNotifier::default();
        let mut rx = notifier.subscribe();

        notifier.add_feed(feed(URL, "Tech")).unwrap();
        notifier.add_posts(vec![post(URL, "a"), post(URL, "b")]);

        assert_eq!(
            drain(&mut rx),
            vec![Change::FeedsChanged, Change::PostsChanged { added: 2 }]
        );
    }

    #[test]
    fn test_noop_mutations_are_silent() {
        let notifier = ChangeNotifier::default();
        notifier.add_feed(feed(URL, "Tech")).unwrap();
        notifier.add_posts(vec![post(URL, "a")]);
        notifier.mark_read("a");
        notifier.set_preview("a").unwrap();

        let mut rx = notifier.subscribe();
        assert_eq!(notifier.add_posts(vec![post(URL, "a")]), 0);
        assert!(!notifier.mark_read("a"));
        assert!(!notifier.mark_read("unknown"));
        notifier.set_preview("a").unwrap();
        assert!(!notifier.refresh_feed(URL, "Tech", "About Tech"));

        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_failed_mutations_are_silent() {
        let notifier = ChangeNotifier::default();
        notifier.add_feed(feed(URL, "Tech")).unwrap();

        let mut rx = notifier.subscribe();
        let err = notifier
            .add_feed(feed("https://example.com/atom", "Again"))
            .unwrap_err();
        assert!(matches!(err, FeedloomError::DuplicateFeed(_)));
        let err = notifier.set_preview("ghost").unwrap_err();
        assert!(matches!(err, FeedloomError::UnknownPost(_)));

        assert!(drain(&mut rx).is_empty());
        assert_eq!(notifier.feeds().len(), 1);
    }

    #[test]
    fn test_each_operation_is_tagged() {
        let notifier = ChangeNotifier::default();
        let mut rx = notifier.subscribe();

        notifier.add_feed(feed(URL, "Tech")).unwrap();
        notifier.add_posts(vec![post(URL, "a")]);
        notifier.mark_read("a");
        notifier.set_preview("a").unwrap();
        notifier.clear_preview();

        let kinds: Vec<_> = drain(&mut rx).iter().map(|c| c.kind().as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                "feeds-changed",
                "posts-changed",
                "read-changed",
                "preview-changed",
                "preview-changed"
            ]
        );
    }

    #[test]
    fn test_snapshot_reflects_read_state() {
        let notifier = ChangeNotifier::default();
        notifier.add_posts(vec![post(URL, "a"), post(URL, "b")]);
        notifier.mark_read("a");

        let snapshot = notifier.snapshot();
        assert!(snapshot.is_read("a"));
        assert!(!snapshot.is_read("b"));
        assert!(notifier.is_read("a"));
        assert_eq!(notifier.unread_count(URL), 1);
    }
}
