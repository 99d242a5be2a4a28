//! Periodic re-fetching of every known feed.
//!
//! Each tick of the timer starts one poll per due feed, each in its own
//! task. Feeds are independent: a failure is recorded for that feed only,
//! and a fetch that never returns only keeps its own feed from being polled
//! again, since a feed with a poll still in flight is not re-polled. The
//! timer keeps re-arming regardless.
//!
//! After `n` consecutive failures a feed sits out
//! `min(2^(n-1) - 1, max_backoff_cycles)` cycles, so a single failure just
//! means "try again next interval".

mod status;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::{watch, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::app::Result;
use crate::config::interval::format_interval;
use crate::config::PollerConfig;
use crate::domain::Feed;
use crate::fetcher::Fetcher;
use crate::notifier::ChangeNotifier;
use crate::parser::RssParser;

pub use status::{backoff_cycles, PollStatus};

/// Outcome of polling one feed.
#[derive(Debug)]
pub struct PollReport {
    pub feed_url: String,
    pub result: Result<usize>,
}

/// Everything a single poll task needs.
#[derive(Clone)]
struct PollWorker {
    notifier: Arc<ChangeNotifier>,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    parser: RssParser,
}

impl PollWorker {
    async fn poll(&self, feed: &Feed) -> Result<usize> {
        let body = self.fetcher.fetch(&feed.url).await?;
        let parsed = self.parser.parse(&feed.url, &body)?;

        if self
            .notifier
            .refresh_feed(&feed.url, &parsed.title, &parsed.description)
        {
            info!("Feed {} changed its title or description", feed.url);
        }

        Ok(self.notifier.add_posts(parsed.posts))
    }
}

/// Removes a feed from the in-flight set when its task ends, however it ends.
struct InFlightGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
    url: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.url);
    }
}

pub struct Poller {
    worker: PollWorker,
    config: PollerConfig,
    semaphore: Arc<Semaphore>,
    in_flight: Arc<Mutex<HashSet<String>>>,
    statuses: Mutex<HashMap<String, PollStatus>>,
}

impl Poller {
    pub fn new(
        notifier: Arc<ChangeNotifier>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        parser: RssParser,
        config: PollerConfig,
    ) -> Self {
        Self {
            worker: PollWorker {
                notifier,
                fetcher,
                parser,
            },
            semaphore: Arc::new(Semaphore::new(config.workers.max(1))),
            config,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            statuses: Mutex::new(HashMap::new()),
        }
    }

    fn statuses(&self) -> MutexGuard<'_, HashMap<String, PollStatus>> {
        self.statuses.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Diagnostics for one feed, if it has been polled.
    pub fn status(&self, feed_url: &str) -> Option<PollStatus> {
        self.statuses().get(feed_url).cloned()
    }

    /// Feeds to poll this cycle, marked in flight.
    fn due_feeds(&self) -> Vec<Feed> {
        let feeds = self.worker.notifier.feeds();
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let mut statuses = self.statuses();

        feeds
            .into_iter()
            .filter(|feed| {
                if in_flight.contains(&feed.url) {
                    debug!("Poll of {} still in flight, skipping", feed.url);
                    return false;
                }
                if let Some(status) = statuses.get_mut(&feed.url) {
                    if status.skip_cycles > 0 {
                        status.skip_cycles -= 1;
                        debug!("Backing off {} ({} cycles left)", feed.url, status.skip_cycles);
                        return false;
                    }
                }
                in_flight.insert(feed.url.clone());
                true
            })
            .collect()
    }

    fn spawn_poll(&self, tasks: &mut JoinSet<(String, Result<usize>)>, feed: Feed) {
        let worker = self.worker.clone();
        let semaphore = self.semaphore.clone();
        let guard = InFlightGuard {
            in_flight: self.in_flight.clone(),
            url: feed.url.clone(),
        };

        tasks.spawn(async move {
            let _guard = guard;
            let _permit = semaphore.acquire_owned().await.ok();
            let result = worker.poll(&feed).await;
            (feed.url, result)
        });
    }

    fn record(&self, feed_url: &str, result: &Result<usize>) {
        let mut statuses = self.statuses();
        let status = statuses.entry(feed_url.to_string()).or_default();

        match result {
            Ok(count) => {
                status.record_success(*count);
                if *count > 0 {
                    info!("{} new posts from {}", count, feed_url);
                } else {
                    debug!("No new posts from {}", feed_url);
                }
            }
            Err(e) => {
                status.record_failure(e, self.config.max_backoff_cycles);
                warn!(
                    "Error polling {} ({} in a row, skipping {} cycles): {}",
                    feed_url, status.consecutive_failures, status.skip_cycles, e
                );
            }
        }
    }

    /// Run one full cycle and wait for every poll in it.
    pub async fn poll_once(&self) -> Vec<PollReport> {
        let start = Instant::now();
        let mut tasks = JoinSet::new();
        for feed in self.due_feeds() {
            self.spawn_poll(&mut tasks, feed);
        }

        let mut reports = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((feed_url, result)) => {
                    self.record(&feed_url, &result);
                    reports.push(PollReport { feed_url, result });
                }
                Err(e) => error!("Poll task join error: {}", e),
            }
        }

        let total_new: usize = reports.iter().filter_map(|r| r.result.as_ref().ok()).sum();
        let errors = reports.iter().filter(|r| r.result.is_err()).count();
        info!(
            "Poll complete: {} new posts, {} errors ({:.1}s)",
            total_new,
            errors,
            start.elapsed().as_secs_f64()
        );

        reports
    }

    /// Poll on every tick until `shutdown` flips (or its sender is dropped).
    ///
    /// Polls still running at shutdown are aborted.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Poller started (interval: {})",
            format_interval(self.config.interval_secs)
        );

        let mut timer = interval(self.config.interval());
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        if !self.config.poll_on_start {
            // The first tick completes immediately.
            timer.tick().await;
        }

        let mut tasks = JoinSet::new();
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = timer.tick() => {
                    let due = self.due_feeds();
                    debug!("Poll cycle: {} feeds due", due.len());
                    for feed in due {
                        self.spawn_poll(&mut tasks, feed);
                    }
                }
                Some(joined) = tasks.join_next() => {
                    match joined {
                        Ok((feed_url, result)) => self.record(&feed_url, &result),
                        Err(e) => error!("Poll task join error: {}", e),
                    }
                }
            }
        }

        info!("Poller shutting down, aborting {} polls", tasks.len());
        tasks.shutdown().await;
    }

    pub fn spawn(self: Arc<Self>) -> PollerHandle {
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(self.run(rx));
        PollerHandle { shutdown: tx, task }
    }
}

pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the timer, abort in-flight polls and wait for the loop to end.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!("Poller task ended abnormally: {}", e);
        }
    }
}
