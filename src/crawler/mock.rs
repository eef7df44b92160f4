//! In-memory fetcher for tests and offline runs.
//!
//! `MockFetcher` serves pre-registered bodies keyed by URL, records every
//! request it receives, and can fall back to a generator for URLs it does not
//! know, which makes unbounded link spaces easy to model.
//!
//! # Example
//!
//! ```
//! use sitemapper::crawler::{MockFetcher, PageFetcher};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let fetcher = MockFetcher::new().with_page("http://example.com", r#"<a href="/a">A</a>"#);
//! let page = fetcher.fetch("http://example.com", Duration::from_secs(1)).await.unwrap();
//! assert_eq!(page.status_code, 200);
//! # }
//! ```

use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::Duration;

type Generator = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// A canned response
#[derive(Debug, Clone)]
pub struct MockResponse {
    result: Result<FetchedPage, FetchError>,
    delay: Option<Duration>,
}

impl MockResponse {
    /// A 200 `text/html` response
    pub fn html(url: &str, body: impl Into<String>) -> Self {
        Self {
            result: Ok(FetchedPage {
                final_url: url.to_string(),
                status_code: 200,
                content_type: Some("text/html; charset=utf-8".to_string()),
                body: body.into().into_bytes(),
            }),
            delay: None,
        }
    }

    /// A failed fetch
    pub fn error(error: FetchError) -> Self {
        Self {
            result: Err(error),
            delay: None,
        }
    }

    /// An arbitrary successful page
    pub fn page(page: FetchedPage) -> Self {
        Self {
            result: Ok(page),
            delay: None,
        }
    }

    /// Delays the response; the builder's timeout still applies
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Mock fetcher that returns pre-configured pages.
///
/// Unknown URLs yield `FetchError::Status(404)` unless a generator is set.
pub struct MockFetcher {
    responses: RwLock<HashMap<String, MockResponse>>,
    generator: Option<Generator>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            generator: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Registers an HTML page (builder style)
    pub fn with_page(self, url: &str, html: impl Into<String>) -> Self {
        self.insert(url, MockResponse::html(url, html));
        self
    }

    /// Registers a failing URL (builder style)
    pub fn with_error(self, url: &str, error: FetchError) -> Self {
        self.insert(url, MockResponse::error(error));
        self
    }

    /// Registers any response (builder style)
    pub fn with_response(self, url: &str, response: MockResponse) -> Self {
        self.insert(url, response);
        self
    }

    /// Serves generated HTML for URLs without a registered response
    pub fn with_generator<G>(mut self, generator: G) -> Self
    where
        G: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Registers a response after construction.
    pub fn insert(&self, url: &str, response: MockResponse) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(url.to_string(), response);
        }
    }

    /// URLs requested so far, in request order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn lookup(&self, url: &str) -> MockResponse {
        let registered = self
            .responses
            .read()
            .ok()
            .and_then(|responses| responses.get(url).cloned());

        if let Some(response) = registered {
            return response;
        }

        match self.generator.as_ref().and_then(|generate| generate(url)) {
            Some(html) => MockResponse::html(url, html),
            None => MockResponse::error(FetchError::Status(404)),
        }
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<FetchedPage, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }

        let response = self.lookup(url);
        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }
        response.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_registered_page() {
        let fetcher = MockFetcher::new().with_page("http://example.com", "<p>hi</p>");

        let page = fetcher.fetch("http://example.com", TIMEOUT).await.unwrap();
        assert_eq!(page.body, b"<p>hi</p>");
        assert_eq!(page.final_url, "http://example.com");
        assert!(page.is_html());
    }

    #[tokio::test]
    async fn test_unknown_url_is_404() {
        let fetcher = MockFetcher::new();
        let result = fetcher.fetch("http://example.com/missing", TIMEOUT).await;
        assert_eq!(result, Err(FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_registered_error() {
        let fetcher = MockFetcher::new()
            .with_error("http://example.com", FetchError::Transport("refused".into()));
        let result = fetcher.fetch("http://example.com", TIMEOUT).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_generator_fallback() {
        let fetcher = MockFetcher::new().with_generator(|url| {
            url.strip_prefix("http://example.com/n/")
                .map(|n| format!("<p>{}</p>", n))
        });

        let page = fetcher.fetch("http://example.com/n/7", TIMEOUT).await.unwrap();
        assert_eq!(page.body, b"<p>7</p>");
        assert!(fetcher.fetch("http://example.com/x", TIMEOUT).await.is_err());
    }

    #[tokio::test]
    async fn test_calls_recorded() {
        let fetcher = MockFetcher::new().with_page("http://example.com", "");
        let _ = fetcher.fetch("http://example.com", TIMEOUT).await;
        let _ = fetcher.fetch("http://example.com/a", TIMEOUT).await;

        assert_eq!(
            fetcher.calls(),
            vec!["http://example.com", "http://example.com/a"]
        );
        assert_eq!(fetcher.call_count(), 2);
    }
}
