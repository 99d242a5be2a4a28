use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub feed_url: String,
    pub title: String,
    pub link: String,
    pub description: String,
}

impl Post {
    /// Deterministic id for items that carry no `guid`.
    pub fn generate_id(feed_url: &str, link: &str, title: &str) -> String {
        let mut hasher = Sha256::new();
        for part in [feed_url, link, title] {
            hasher.update(part.as_bytes());
            // Separator keeps ("ab", "c") and ("a", "bc") apart.
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}
