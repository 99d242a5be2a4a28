use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::{FeedloomError, Result};
use crate::fetcher::Fetcher;

#[derive(Debug, Clone)]
enum Response {
    Body(String),
    Fail(String),
    Hang,
}

/// In-memory fetcher with per-URL canned responses.
#[derive(Default)]
pub(crate) struct StubFetcher {
    responses: Mutex<HashMap<String, Response>>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, url: &str, body: impl Into<String>) {
        self.set(url, Response::Body(body.into()));
    }

    pub(crate) fn fail(&self, url: &str, reason: &str) {
        self.set(url, Response::Fail(reason.to_string()));
    }

    /// Requests for `url` never complete.
    pub(crate) fn hang(&self, url: &str) {
        self.set(url, Response::Hang);
    }

    pub(crate) fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    fn set(&self, url: &str, response: Response) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        let response = self.responses.lock().unwrap().get(url).cloned();

        match response {
            Some(Response::Body(body)) => Ok(body),
            Some(Response::Fail(reason)) => Err(FeedloomError::Network(reason)),
            Some(Response::Hang) => std::future::pending().await,
            None => Err(FeedloomError::Network(format!("{} returned 404", url))),
        }
    }
}
