//! Site graph builder - main crawl orchestration logic
//!
//! This module contains the breadth-first loop that turns a root URL into a
//! `SiteGraph`:
//! - Dequeuing one BFS level at a time from the frontier
//! - Fetching the level with bounded concurrency and a per-fetch timeout
//! - Extracting and classifying links, then enqueuing in-domain children
//! - Stopping on frontier exhaustion, page limit or cancellation

use crate::config::{validate_crawler_config, CrawlerConfig};
use crate::crawler::cancel::CancelToken;
use crate::crawler::extractor::{extract_links, parse_document};
use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::graph::{Link, PageNode, SiteGraph};
use crate::url::{LinkClassification, LinkClassifier};
use crate::{FetchError, SitemapError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use url::Url;

/// How often (in processed pages) progress is logged
const PROGRESS_INTERVAL: usize = 10;

/// A page whose fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreachablePage {
    /// Canonical URL of the page
    pub url: String,

    /// BFS depth at which it was attempted
    pub depth: u32,

    /// Why the fetch failed
    pub error: FetchError,
}

/// Result of a completed (or stopped) build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// The link graph; always contains the root key
    pub graph: SiteGraph,

    /// Pages recorded as unreachable, in processing order
    pub unreachable: Vec<UnreachablePage>,

    /// Number of fetch results processed
    pub pages_fetched: usize,

    /// True if the build stopped because cancellation was requested
    pub cancelled: bool,

    /// True if URLs were still queued when the page limit was hit
    pub page_limit_reached: bool,

    /// Wall-clock duration of the build
    pub elapsed: Duration,
}

impl BuildReport {
    /// Returns true if every reachable page within the depth bound was visited
    pub fn is_complete(&self) -> bool {
        !self.cancelled && !self.page_limit_reached
    }
}

/// Builds the site graph for `config.root_host`
///
/// Invalid configuration is reported before any fetch is attempted. Failed
/// pages never abort the build; they are recorded in the report instead.
///
/// # Example
///
/// ```
/// use sitemapper::config::CrawlerConfig;
/// use sitemapper::crawler::{build, MockFetcher};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), sitemapper::SitemapError> {
/// let fetcher = Arc::new(MockFetcher::new().with_page(
///     "http://example.com",
///     r#"<a href="/about">About</a><a href="http://other.com">Other</a>"#,
/// ));
/// let report = build(&CrawlerConfig::new("http://example.com"), fetcher).await?;
/// assert!(report.graph.contains("http://example.com/about"));
/// # Ok(())
/// # }
/// ```
pub async fn build<F>(config: &CrawlerConfig, fetcher: Arc<F>) -> Result<BuildReport, SitemapError>
where
    F: PageFetcher + 'static,
{
    build_with_cancel(config, fetcher, CancelToken::never()).await
}

/// Builds the site graph, stopping early when `cancel` fires
///
/// On cancellation no new fetches are issued, in-flight fetches are
/// aborted, and the pages processed so far are returned with
/// `cancelled = true`.
pub async fn build_with_cancel<F>(
    config: &CrawlerConfig,
    fetcher: Arc<F>,
    cancel: CancelToken,
) -> Result<BuildReport, SitemapError>
where
    F: PageFetcher + 'static,
{
    validate_crawler_config(config)?;
    let classifier = LinkClassifier::new(&config.root_host)?;

    let builder = SiteGraphBuilder::new(config, classifier, fetcher, cancel);
    Ok(builder.run().await)
}

/// State owned by a single build
///
/// The frontier, visit set and graph are only touched by the coordinating
/// task; fetch tasks hand their results back through the `JoinSet`.
struct SiteGraphBuilder<F> {
    classifier: LinkClassifier,
    fetcher: Arc<F>,
    cancel: CancelToken,
    frontier: Frontier,
    graph: SiteGraph,
    unreachable: Vec<UnreachablePage>,
    page_limit: usize,
    max_concurrent: usize,
    timeout: Duration,
    issued: usize,
    pages_fetched: usize,
    cancelled: bool,
    page_limit_reached: bool,
}

type SlotResult = Option<Result<FetchedPage, FetchError>>;

impl<F> SiteGraphBuilder<F>
where
    F: PageFetcher + 'static,
{
    fn new(
        config: &CrawlerConfig,
        classifier: LinkClassifier,
        fetcher: Arc<F>,
        cancel: CancelToken,
    ) -> Self {
        let root = classifier.root_canonical().to_string();

        Self {
            frontier: Frontier::new(&root, config.depth_bound()),
            graph: SiteGraph::new(root),
            classifier,
            fetcher,
            cancel,
            unreachable: Vec::new(),
            page_limit: config.page_limit as usize,
            max_concurrent: config.max_concurrent_fetches.max(1) as usize,
            timeout: config.fetch_timeout(),
            issued: 0,
            pages_fetched: 0,
            cancelled: false,
            page_limit_reached: false,
        }
    }

    async fn run(mut self) -> BuildReport {
        let start_time = Instant::now();
        tracing::info!(
            root = %self.graph.root(),
            page_limit = self.page_limit,
            concurrency = self.max_concurrent,
            "Starting site graph build"
        );

        loop {
            if self.cancel.is_cancelled() {
                self.cancelled = true;
                break;
            }

            if self.frontier.is_empty() {
                tracing::info!("Frontier is empty, build complete");
                break;
            }

            let budget = self.page_limit.saturating_sub(self.issued);
            if budget == 0 {
                tracing::info!(
                    "Page limit of {} reached with {} URLs still queued",
                    self.page_limit,
                    self.frontier.len()
                );
                self.page_limit_reached = true;
                break;
            }

            let level = self.frontier.pop_level(budget);
            let results = self.fetch_level(&level).await;

            for (queued, result) in level.into_iter().zip(results) {
                if let Some(result) = result {
                    self.record(queued, result);
                }
            }

            if self.cancelled {
                break;
            }
        }

        if self.cancelled {
            tracing::warn!(
                "Build cancelled after {} pages, returning partial graph",
                self.pages_fetched
            );
        }

        // The root key is present even if it was never fetched
        let root = self.graph.root().to_string();
        if !self.graph.contains(&root) {
            self.graph.insert(PageNode::not_fetched(root, 0));
        }

        let elapsed = start_time.elapsed();
        tracing::info!(
            "Build finished: {} pages, {} links, {} unreachable in {:?}",
            self.graph.len(),
            self.graph.edge_count(),
            self.unreachable.len(),
            elapsed
        );

        BuildReport {
            graph: self.graph,
            unreachable: self.unreachable,
            pages_fetched: self.pages_fetched,
            cancelled: self.cancelled,
            page_limit_reached: self.page_limit_reached,
            elapsed,
        }
    }

    /// Fetches one level, keeping at most `max_concurrent` requests in flight
    ///
    /// The returned slots line up with `level`. A slot is `None` only when
    /// its fetch was aborted by cancellation.
    async fn fetch_level(&mut self, level: &[QueuedUrl]) -> Vec<SlotResult> {
        let mut results: Vec<SlotResult> = vec![None; level.len()];
        let mut tasks = JoinSet::new();
        let mut cancel = self.cancel.clone();
        let mut next = 0;

        loop {
            while next < level.len() && tasks.len() < self.max_concurrent && !cancel.is_cancelled()
            {
                let fetcher = Arc::clone(&self.fetcher);
                let url = level[next].url.clone();
                let timeout = self.timeout;
                let index = next;

                tasks.spawn(async move {
                    let result =
                        match tokio::time::timeout(timeout, fetcher.fetch(&url, timeout)).await {
                            Ok(result) => result,
                            Err(_) => Err(FetchError::Timeout(timeout)),
                        };
                    (index, result)
                });

                self.issued += 1;
                next += 1;
            }

            if tasks.is_empty() {
                if next < level.len() {
                    self.cancelled = true;
                }
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::warn!("Cancellation requested, aborting {} in-flight fetches", tasks.len());
                    tasks.abort_all();
                    while let Some(joined) = tasks.join_next().await {
                        if let Ok((index, result)) = joined {
                            results[index] = Some(result);
                        }
                    }
                    self.cancelled = true;
                    break;
                }
                joined = tasks.join_next() => {
                    match joined {
                        Some(Ok((index, result))) => results[index] = Some(result),
                        Some(Err(e)) => tracing::error!("Fetch task failed: {}", e),
                        None => break,
                    }
                }
            }
        }

        if !self.cancelled {
            for slot in results.iter_mut().filter(|slot| slot.is_none()) {
                *slot = Some(Err(FetchError::Transport("fetch task failed".to_string())));
            }
        }

        results
    }

    /// Applies one fetch result to the graph and frontier
    fn record(&mut self, queued: QueuedUrl, result: Result<FetchedPage, FetchError>) {
        self.pages_fetched += 1;

        match result.and_then(|page| self.outbound_links(&queued, page)) {
            Ok(links) => {
                let page = PageNode::fetched(&queued.url, queued.depth, links);
                tracing::debug!(
                    "Fetched {} (depth {}, {} in-domain links)",
                    queued.url,
                    queued.depth,
                    page.outbound_links().len()
                );

                if !self.cancelled {
                    let child_depth = queued.depth + 1;
                    for url in page.outbound_urls() {
                        self.frontier.enqueue(url, child_depth);
                    }
                }

                self.graph.insert(page);
            }
            Err(error) => {
                tracing::warn!("Page unreachable: {} ({})", queued.url, error);
                self.graph
                    .insert(PageNode::unreachable(&queued.url, queued.depth));
                self.unreachable.push(UnreachablePage {
                    url: queued.url,
                    depth: queued.depth,
                    error,
                });
            }
        }

        if self.pages_fetched % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} pages processed, {} in frontier",
                self.pages_fetched,
                self.frontier.len()
            );
        }
    }

    /// Extracts the canonical in-domain links of a fetched page
    ///
    /// Non-HTML responses are reachable pages with no links. A body that is
    /// not valid UTF-8 is a parse failure.
    fn outbound_links(&self, queued: &QueuedUrl, page: FetchedPage) -> Result<Vec<Link>, FetchError> {
        if !page.is_html() {
            tracing::debug!(
                "Skipping link extraction for {} (content type {:?})",
                queued.url,
                page.content_type
            );
            return Ok(Vec::new());
        }

        let base = Url::parse(&page.final_url)
            .or_else(|_| Url::parse(&queued.url))
            .map_err(|e| FetchError::Parse(format!("invalid page URL: {}", e)))?;

        let body = String::from_utf8(page.body)
            .map_err(|e| FetchError::Parse(format!("body is not valid UTF-8: {}", e)))?;

        let document = parse_document(&body);
        let links = extract_links(&document)
            .into_iter()
            .filter_map(
                |link| match self.classifier.classify_on_page(link.href(), &base) {
                    LinkClassification::InDomain(canonical) => {
                        Some(Link::new(canonical, link.text()))
                    }
                    other => {
                        tracing::debug!("Skipping {:?} link: {}", other, link.href());
                        None
                    }
                },
            )
            .collect();

        Ok(links)
    }
}
