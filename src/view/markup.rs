//! Markup for each page region, computed from a store snapshot.
//!
//! These functions are pure: the same snapshot and localizer always give
//! the same markup. All interpolated text is HTML-escaped.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::domain::{Feed, Post};
use crate::i18n::Localizer;
use crate::store::StoreSnapshot;

/// Class applied to a post link depending on its read state.
pub fn post_class(read: bool) -> &'static str {
    if read {
        "fw-normal link-secondary"
    } else {
        "fw-bold"
    }
}

pub fn feeds(i18n: &Localizer, snapshot: &StoreSnapshot) -> String {
    if snapshot.feeds.is_empty() {
        return String::new();
    }

    let cards: String = snapshot.feeds.iter().map(|feed| feed_card(i18n, feed)).collect();
    format!(
        r#"<div class="card border-0"><div class="card-body"><h2 class="card-title h4">{}</h2></div><ul class="list-group border-0 rounded-0">{}</ul></div>"#,
        encode_text(&i18n.t("feedsTitle")),
        cards
    )
}

fn feed_card(i18n: &Localizer, feed: &Feed) -> String {
    format!(
        r#"<li class="list-group-item border-0 border-end-0"><h3 class="h6 m-0">{}</h3><p class="m-0 small text-black-50">{}</p></li>"#,
        encode_text(&i18n.t_with("feedTitle", &[("title", feed.display_title())])),
        encode_text(&i18n.t_with(
            "feedDescription",
            &[("description", feed.description.as_str())]
        )),
    )
}

pub fn posts(i18n: &Localizer, snapshot: &StoreSnapshot) -> String {
    if snapshot.posts.is_empty() {
        return String::new();
    }

    let items: String = snapshot
        .posts
        .iter()
        .map(|post| post_item(i18n, post, snapshot.is_read(&post.id)))
        .collect();
    format!(
        r#"<div class="card border-0"><div class="card-body"><h2 class="card-title h4">{}</h2></div><ul class="list-group border-0 rounded-0">{}</ul></div>"#,
        encode_text(&i18n.t("postsTitle")),
        items
    )
}

fn post_item(i18n: &Localizer, post: &Post, read: bool) -> String {
    let id = encode_double_quoted_attribute(&post.id);
    format!(
        r##"<li class="list-group-item d-flex justify-content-between align-items-start border-0 border-end-0"><a href="{href}" class="{class}" data-id="{id}" target="_blank" rel="noopener noreferrer">{title}</a><button type="button" class="btn btn-outline-primary btn-sm" data-id="{id}" data-bs-toggle="modal" data-bs-target="#modal">{button}</button></li>"##,
        href = encode_double_quoted_attribute(&post.link),
        class = post_class(read),
        id = id,
        title = encode_text(post.display_title()),
        button = encode_text(&i18n.t("previewButton")),
    )
}

/// Modal contents; empty when nothing is being previewed.
pub fn modal(i18n: &Localizer, snapshot: &StoreSnapshot) -> String {
    let Some(post) = &snapshot.preview else {
        return String::new();
    };

    format!(
        r#"<div class="modal-header"><h5 class="modal-title">{title}</h5></div><div class="modal-body text-break">{body}</div><div class="modal-footer"><a class="btn btn-primary full-article" href="{href}" role="button" target="_blank" rel="noopener noreferrer">{read_more}</a><button type="button" class="btn btn-secondary" data-bs-dismiss="modal">{close}</button></div>"#,
        title = encode_text(post.display_title()),
        body = encode_text(&post.description),
        href = encode_double_quoted_attribute(&post.link),
        read_more = encode_text(&i18n.t("readMore")),
        close = encode_text(&i18n.t("closeButton")),
    )
}

pub fn feedback(i18n: &Localizer, message_key: &str, is_error: bool) -> String {
    let class = if is_error { "text-danger" } else { "text-success" };
    format!(
        r#"<p class="feedback m-0 position-absolute small {}">{}</p>"#,
        class,
        encode_text(&i18n.t(message_key))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{feed, post};

    const URL: &str = "https://example.com/rss";

    fn snapshot() -> StoreSnapshot {
        StoreSnapshot {
            feeds: vec![feed(URL, "Tech")],
            posts: vec![post(URL, "a"), post(URL, "b")],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_store_renders_nothing() {
        let i18n = Localizer::new("en").unwrap();
        let empty = StoreSnapshot::default();
        assert_eq!(feeds(&i18n, &empty), "");
        assert_eq!(posts(&i18n, &empty), "");
        assert_eq!(modal(&i18n, &empty), "");
    }

    #[test]
    fn test_feeds_markup() {
        let i18n = Localizer::new("en").unwrap();
        let html = feeds(&i18n, &snapshot());
        assert!(html.contains("Feeds"));
        assert!(html.contains(">Tech</h3>"));
        assert!(html.contains("About Tech"));
    }

    #[test]
    fn test_posts_markup_reflects_read_state() {
        let i18n = Localizer::new("en").unwrap();
        let mut snapshot = snapshot();
        snapshot.read.insert("a".to_string());

        let html = posts(&i18n, &snapshot);
        assert!(html.contains(r#"class="fw-normal link-secondary" data-id="a""#));
        assert!(html.contains(r#"class="fw-bold" data-id="b""#));
        assert_eq!(html.matches("Preview").count(), 2);
    }

    #[test]
    fn test_rendering_is_pure() {
        let i18n = Localizer::new("en").unwrap();
        let snapshot = snapshot();
        assert_eq!(posts(&i18n, &snapshot), posts(&i18n, &snapshot));
        assert_eq!(feeds(&i18n, &snapshot), feeds(&i18n, &snapshot));
    }

    #[test]
    fn test_text_is_escaped() {
        let i18n = Localizer::new("en").unwrap();
        let mut snapshot = snapshot();
        snapshot.posts[0].title = "<script>alert(1)</script>".into();

        let html = posts(&i18n, &snapshot);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_modal_markup() {
        let i18n = Localizer::new("en").unwrap();
        let mut snapshot = snapshot();
        let mut previewed = post(URL, "a");
        previewed.description = "Full story".into();
        snapshot.preview = Some(previewed);

        let html = modal(&i18n, &snapshot);
        assert!(html.contains("Post a"));
        assert!(html.contains("Full story"));
        assert!(html.contains(r#"href="https://example.com/a""#));
        assert!(html.contains("Read more"));
    }

    #[test]
    fn test_feedback_markup() {
        let i18n = Localizer::new("en").unwrap();
        let ok = feedback(&i18n, "success", false);
        assert!(ok.contains("text-success"));
        assert!(ok.contains("RSS has been loaded"));

        let err = feedback(&i18n, "networkError", true);
        assert!(err.contains("text-danger"));
        assert!(err.contains("Network error"));
    }
}
