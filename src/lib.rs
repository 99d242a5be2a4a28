//! # Feedloom
//!
//! An RSS aggregator: subscribe to feeds by URL, keep their posts in
//! memory, and re-poll every feed on an interval for new posts.
//!
//! ## Architecture
//!
//! ```text
//! Submission → Validate → Fetch (proxy) → Parse → Store ─┐
//! Poller ──────────────── Fetch (proxy) → Parse → Store ─┤
//!                                                        ▼
//!                                    ChangeNotifier → ViewRenderer → Dom
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Subscribe and print what was loaded
//! feedloom add https://lorem-rss.hexlet.app/feed
//!
//! # Subscribe, then keep polling and redrawing until Ctrl-C
//! feedloom watch https://lorem-rss.hexlet.app/feed --interval 30s
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components
/// in their documented initialization order.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/feedloom/config.toml`.
pub mod config;

/// Submission of new feeds and post preview actions.
pub mod controller;

/// Core domain models.
///
/// - [`Feed`](domain::Feed): subscribed source, identified by [`FeedKey`](domain::FeedKey)
/// - [`Post`](domain::Post): one item, identified by its `guid`
pub mod domain;

/// Fetching feed documents through a CORS proxy.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for feed fetching
/// - [`ProxyFetcher`](fetcher::ProxyFetcher): reqwest-based implementation
pub mod fetcher;

/// Localized message lookup.
pub mod i18n;

/// Change events emitted after each store mutation.
pub mod notifier;

/// RSS document parsing.
pub mod parser;

/// Periodic re-polling of known feeds.
pub mod poller;

/// In-memory feed, post and read-state storage.
pub mod store;

/// Validation of submitted URLs.
pub mod validate;

/// Region-by-region rendering of the page.
pub mod view;
