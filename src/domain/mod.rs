pub mod feed;
pub mod post;

pub use feed::{Feed, FeedKey};
pub use post::Post;

/// Result of parsing one feed document: channel metadata plus its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFeed {
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub posts: Vec<Post>,
}
