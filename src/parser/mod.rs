//! RSS document parsing.
//!
//! Turns the text of a feed document into a [`ParsedFeed`]. The text must
//! be well-formed XML, and only documents built around a `channel` element
//! (RSS 0.9x, 1.0 and 2.0) are accepted; anything else, including
//! well-formed Atom or JSON Feed documents, is a [`FeedloomError::Parse`].
//! Parsing never panics and has no side effects.

use feed_rs::model::{Entry, FeedType, Link, Text};
use feed_rs::parser::{Builder, Parser};
use html_escape::decode_html_entities;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::app::{FeedloomError, Result};
use crate::domain::{ParsedFeed, Post};

#[derive(Debug, Clone, Default)]
pub struct RssParser;

impl RssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `body`, stamping every post with `feed_url` as its owner.
    pub fn parse(&self, feed_url: &str, body: &str) -> Result<ParsedFeed> {
        let body = body.trim_start_matches('\u{feff}');
        ensure_well_formed(body)?;

        let feed = feed_parser(feed_url)
            .parse(body.as_bytes())
            .map_err(|e| FeedloomError::Parse(e.to_string()))?;

        match feed.feed_type {
            FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2 => {}
            other => {
                return Err(FeedloomError::Parse(format!(
                    "no channel element ({:?} document)",
                    other
                )))
            }
        }

        let title = feed
            .title
            .map(|t| decode(&t.content))
            .ok_or_else(|| FeedloomError::Parse("channel has no title".into()))?;

        let posts = feed
            .entries
            .into_iter()
            .map(|entry| to_post(feed_url, entry))
            .collect();

        Ok(ParsedFeed {
            title,
            description: feed
                .description
                .map(|d| decode(&d.content))
                .unwrap_or_default(),
            link: feed.links.into_iter().next().map(|l| l.href),
            posts,
        })
    }
}

/// feed-rs parser whose ids for guid-less items depend only on the document.
fn feed_parser(feed_url: &str) -> Parser {
    let feed_url = feed_url.to_string();
    Builder::new()
        .id_generator(
            move |links: &[Link], title: &Option<Text>, _uri: Option<&str>| -> String {
                generated_id(&feed_url, links.first(), title.as_ref())
            },
        )
        .build()
}

fn generated_id(feed_url: &str, link: Option<&Link>, title: Option<&Text>) -> String {
    Post::generate_id(
        feed_url,
        link.map(|l| l.href.as_str()).unwrap_or_default(),
        title.map(|t| t.content.as_str()).unwrap_or_default(),
    )
}

/// Reject text that is not a single well-formed XML element.
///
/// feed-rs stops reading once the root element closes, so junk after it
/// would otherwise go unnoticed.
fn ensure_well_formed(body: &str) -> Result<()> {
    let malformed = |reason: String| FeedloomError::Parse(format!("malformed XML: {}", reason));

    let mut reader = Reader::from_str(body);
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|e| malformed(e.to_string()))?;
        let outside_root = depth == 0;

        match event {
            Event::Start(_) | Event::Empty(_) if outside_root && seen_root => {
                return Err(malformed("content after the root element".into()));
            }
            Event::Start(_) => {
                depth += 1;
                seen_root = true;
            }
            Event::Empty(_) => seen_root = true,
            Event::End(_) if outside_root => {
                return Err(malformed("unexpected closing tag".into()));
            }
            Event::End(_) => depth -= 1,
            Event::Text(text) if outside_root => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(malformed("text outside the root element".into()));
                }
            }
            Event::CData(_) if outside_root => {
                return Err(malformed("text outside the root element".into()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(malformed("no root element".into()));
    }
    if depth > 0 {
        return Err(malformed("unclosed element".into()));
    }
    Ok(())
}

fn to_post(feed_url: &str, entry: Entry) -> Post {
    let link = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_default();

    let id = if entry.id.trim().is_empty() {
        generated_id(feed_url, entry.links.first(), entry.title.as_ref())
    } else {
        entry.id
    };

    let description = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body))
        .map(|d| decode(&d))
        .unwrap_or_default();

    Post {
        id,
        feed_url: feed_url.to_string(),
        title: entry.title.map(|t| decode(&t.content)).unwrap_or_default(),
        link,
        description,
    }
}

fn decode(s: &str) -> String {
    decode_html_entities(s.trim()).to_string()
}
