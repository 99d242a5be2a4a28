//! Keeps the page in sync with the store.
//!
//! [`ViewRenderer`] listens to [`Change`] notifications and redraws only the
//! region each one affects, from a fresh snapshot:
//!
//! | Change            | Region  |
//! |-------------------|---------|
//! | `feeds-changed`   | Feeds   |
//! | `posts-changed`   | Posts   |
//! | `read-changed`    | Posts   |
//! | `preview-changed` | Modal   |

pub mod dom;
pub mod markup;

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::i18n::Localizer;
use crate::notifier::{Change, ChangeKind, ChangeNotifier};

pub use dom::{Dom, Region, TerminalDom};

/// Inline message under the submission form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Success,
    Error { message_key: &'static str },
}

pub struct ViewRenderer {
    notifier: Arc<ChangeNotifier>,
    i18n: Arc<Localizer>,
    dom: Arc<dyn Dom + Send + Sync>,
}

impl ViewRenderer {
    pub fn new(
        notifier: Arc<ChangeNotifier>,
        i18n: Arc<Localizer>,
        dom: Arc<dyn Dom + Send + Sync>,
    ) -> Self {
        Self {
            notifier,
            i18n,
            dom,
        }
    }

    pub fn region_for(kind: ChangeKind) -> Region {
        match kind {
            ChangeKind::FeedsChanged => Region::Feeds,
            ChangeKind::PostsChanged | ChangeKind::ReadChanged => Region::Posts,
            ChangeKind::PreviewChanged => Region::Modal,
        }
    }

    pub fn apply(&self, change: &Change) {
        self.render_region(Self::region_for(change.kind()));
    }

    pub fn render_region(&self, region: Region) {
        let snapshot = self.notifier.snapshot();
        let html = match region {
            Region::Feeds => markup::feeds(&self.i18n, &snapshot),
            Region::Posts => markup::posts(&self.i18n, &snapshot),
            Region::Modal => markup::modal(&self.i18n, &snapshot),
            // Feedback is driven by submissions, not by store state.
            Region::Feedback => return,
        };
        debug!("Rendering {}", region.selector());
        self.dom.replace_children(region, &html);
    }

    pub fn render_all(&self) {
        for region in [Region::Feeds, Region::Posts, Region::Modal] {
            self.render_region(region);
        }
    }

    pub fn show_feedback(&self, feedback: &Feedback) {
        let (key, is_error) = match feedback {
            Feedback::Success => ("success", false),
            Feedback::Error { message_key } => (*message_key, true),
        };
        self.dom.set_input_invalid(is_error);
        self.dom
            .replace_children(Region::Feedback, &markup::feedback(&self.i18n, key, is_error));
    }

    /// Apply notifications until this task is aborted.
    ///
    /// The renderer holds the notifier, so the channel stays open while it runs.
    pub async fn run(self: Arc<Self>, mut rx: broadcast::Receiver<Change>) {
        loop {
            match rx.recv().await {
                Ok(change) => self.apply(&change),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("View fell behind by {} changes, redrawing", skipped);
                    self.render_all();
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// Subscribe to the notifier and render on a background task.
    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let rx = self.notifier.subscribe();
        tokio::spawn(self.run(rx))
    }
}
