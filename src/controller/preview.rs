use std::sync::Arc;

use crate::app::Result;
use crate::notifier::ChangeNotifier;

/// Opening and closing the post preview.
pub struct PreviewController {
    notifier: Arc<ChangeNotifier>,
}

impl PreviewController {
    pub fn new(notifier: Arc<ChangeNotifier>) -> Self {
        Self { notifier }
    }

    /// Show `post_id` in the modal and mark it read.
    ///
    /// An unknown id fails before anything changes.
    pub fn open(&self, post_id: &str) -> Result<()> {
        self.notifier.set_preview(post_id)?;
        self.notifier.mark_read(post_id);
        Ok(())
    }

    pub fn close(&self) {
        self.notifier.clear_preview();
    }
}
