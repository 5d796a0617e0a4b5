//! Units of work handed to the fetcher and the payloads it returns.

/// A single page to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    /// Absolute URL to request.
    pub url: String,
    /// 1-based position in the batch; enables the progress line on success.
    pub index: Option<usize>,
    /// Free-form context carried into log lines (e.g. `team 500011`).
    pub label: Option<String>,
}

impl FetchTask {
    /// Creates an unindexed task for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            index: None,
            label: None,
        }
    }

    /// Sets the batch ordinal.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Attaches a log label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builds indexed tasks (starting at 1) from a list of URLs.
    pub fn enumerate<I, S>(urls: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        urls.into_iter()
            .enumerate()
            .map(|(i, url)| Self::new(url).with_index(i + 1))
            .collect()
    }
}

/// A successful (2xx) response with its body fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// URL the task requested.
    pub url: String,
    /// Batch ordinal of the originating task.
    pub index: Option<usize>,
    /// HTTP status code (always 2xx).
    pub status: u16,
    /// Decoded response body.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_assigns_one_based_indices() {
        let tasks = FetchTask::enumerate(["https://a.test/1", "https://a.test/2"]);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].index, Some(1));
        assert_eq!(tasks[1].index, Some(2));
        assert_eq!(tasks[1].url, "https://a.test/2");
    }

    #[test]
    fn test_new_task_has_no_index_or_label() {
        let task = FetchTask::new("https://a.test/ladder");
        assert!(task.index.is_none());
        assert!(task.label.is_none());

        let task = task.with_label("ladder");
        assert_eq!(task.label.as_deref(), Some("ladder"));
    }
}
