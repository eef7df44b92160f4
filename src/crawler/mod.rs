//! Crawler module for building the site graph
//!
//! This module contains the core crawling logic, including:
//! - Page fetching behind the `PageFetcher` trait (HTTP and in-memory)
//! - HTML parsing and link extraction
//! - The breadth-first frontier
//! - Overall build coordination and cancellation

mod builder;
mod cancel;
mod extractor;
mod fetcher;
mod frontier;
mod mock;

pub use builder::{build, build_with_cancel, BuildReport, UnreachablePage};
pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use extractor::{extract_links, extract_links_from_html, parse_document, MAX_DOCUMENT_NODES};
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
pub use frontier::{Frontier, QueuedUrl};
pub use mock::{MockFetcher, MockResponse};
