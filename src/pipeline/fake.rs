//! Canned-page fetcher for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::fetch::{FetchLimits, FetchResponse, FetchTask, PageFetcher};

/// Serves bodies by URL; unknown URLs behave like failed requests.
#[derive(Debug, Default)]
pub(crate) struct CannedFetcher {
    pages: HashMap<String, String>,
    batches: Mutex<Vec<(Vec<String>, FetchLimits)>>,
}

impl CannedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    /// URLs and limits of every batch received, in call order.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn batches(&self) -> Vec<(Vec<String>, FetchLimits)> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for CannedFetcher {
    #[allow(clippy::unwrap_used)]
    async fn fetch_all(&self, tasks: Vec<FetchTask>, limits: FetchLimits) -> Vec<FetchResponse> {
        let urls = tasks.iter().map(|task| task.url.clone()).collect();
        self.batches.lock().unwrap().push((urls, limits));

        tasks
            .into_iter()
            .filter_map(|task| {
                self.pages.get(&task.url).map(|body| FetchResponse {
                    url: task.url,
                    index: task.index,
                    status: 200,
                    body: body.clone(),
                })
            })
            .collect()
    }
}
