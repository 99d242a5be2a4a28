//! In-memory feed state.
//!
//! [`FeedStore`] owns every feed, post, read flag and the current preview.
//! It only changes through the named operations below, each of which
//! reports whether it actually changed anything so the
//! [`ChangeNotifier`](crate::notifier::ChangeNotifier) can stay quiet on
//! no-ops.

use std::collections::HashSet;

use crate::app::{FeedloomError, Result};
use crate::domain::{Feed, FeedKey, Post};

#[derive(Debug, Default)]
pub struct FeedStore {
    feeds: Vec<Feed>,
    feed_keys: HashSet<FeedKey>,
    posts: Vec<Post>,
    post_ids: HashSet<String>,
    read: HashSet<String>,
    preview: Option<String>,
}

/// Owned copy of the store, taken for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub feeds: Vec<Feed>,
    pub posts: Vec<Post>,
    pub read: HashSet<String>,
    pub preview: Option<Post>,
}

impl StoreSnapshot {
    pub fn is_read(&self, post_id: &str) -> bool {
        self.read.contains(post_id)
    }
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Feed operations

    /// Fails when a feed with the same normalized host already exists.
    pub fn check_unique(&self, key: &FeedKey) -> Result<()> {
        if self.feed_keys.contains(key) {
            return Err(FeedloomError::DuplicateFeed(key.to_string()));
        }
        Ok(())
    }

    pub fn add_feed(&mut self, feed: Feed) -> Result<Feed> {
        self.check_unique(&feed.key)?;
        self.feed_keys.insert(feed.key.clone());
        self.feeds.push(feed.clone());
        Ok(feed)
    }

    /// Refresh the title and description of a known feed.
    ///
    /// Returns `true` when either value changed.
    pub fn refresh_feed(&mut self, url: &str, title: &str, description: &str) -> bool {
        let Some(feed) = self.feeds.iter_mut().find(|f| f.url == url) else {
            return false;
        };

        if feed.title == title && feed.description == description {
            return false;
        }

        feed.title = title.to_string();
        feed.description = description.to_string();
        true
    }

    pub fn feeds(&self) -> &[Feed] {
        &self.feeds
    }

    // Post operations

    /// Append every post whose id is not yet known, in source order.
    ///
    /// Duplicates within `posts` itself are dropped as well. Returns the
    /// number of posts actually added.
    pub fn add_posts(&mut self, posts: Vec<Post>) -> usize {
        let before = self.posts.len();
        for post in posts {
            if self.post_ids.insert(post.id.clone()) {
                self.posts.push(post);
            }
        }
        self.posts.len() - before
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get_post(&self, id: &str) -> Option<&Post> {
        if !self.contains_post(id) {
            return None;
        }
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn contains_post(&self, id: &str) -> bool {
        self.post_ids.contains(id)
    }

    // State operations

    /// Returns `true` only when the post was known and not yet read.
    pub fn mark_read(&mut self, post_id: &str) -> bool {
        if !self.contains_post(post_id) {
            return false;
        }
        self.read.insert(post_id.to_string())
    }

    pub fn is_read(&self, post_id: &str) -> bool {
        self.read.contains(post_id)
    }

    pub fn unread_count(&self, feed_url: &str) -> usize {
        self.posts
            .iter()
            .filter(|p| p.feed_url == feed_url && !self.read.contains(&p.id))
            .count()
    }

    /// Returns `Ok(true)` when the preview switched to a different post.
    pub fn set_preview(&mut self, post_id: &str) -> Result<bool> {
        if !self.contains_post(post_id) {
            return Err(FeedloomError::UnknownPost(post_id.to_string()));
        }
        if self.preview.as_deref() == Some(post_id) {
            return Ok(false);
        }
        self.preview = Some(post_id.to_string());
        Ok(true)
    }

    pub fn clear_preview(&mut self) -> bool {
        self.preview.take().is_some()
    }

    pub fn preview(&self) -> Option<&Post> {
        self.preview.as_deref().and_then(|id| self.get_post(id))
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            feeds: self.feeds.clone(),
            posts: self.posts.clone(),
            read: self.read.clone(),
            preview: self.preview().cloned(),
        }
    }
}
