use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::FeedloomError;

/// Per-feed poll diagnostics. Never shown in the page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PollStatus {
    pub consecutive_failures: u32,
    /// Cycles left before this feed is polled again.
    pub skip_cycles: u32,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub new_posts_total: usize,
}

impl PollStatus {
    pub(super) fn record_success(&mut self, new_posts: usize) {
        self.consecutive_failures = 0;
        self.skip_cycles = 0;
        self.last_success_at = Some(Utc::now());
        self.new_posts_total += new_posts;
    }

    pub(super) fn record_failure(&mut self, error: &FeedloomError, max_backoff: u32) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.skip_cycles = backoff_cycles(self.consecutive_failures, max_backoff);
        self.last_failure_at = Some(Utc::now());
        self.last_error = Some(error.to_string());
    }
}

/// Cycles to skip after `failures` consecutive failures: `2^(failures-1) - 1`,
/// capped at `max`.
pub fn backoff_cycles(failures: u32, max: u32) -> u32 {
    if failures == 0 {
        return 0;
    }
    1u32.checked_shl(failures - 1)
        .unwrap_or(u32::MAX)
        .saturating_sub(1)
        .min(max)
}
