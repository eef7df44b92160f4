//! Sitemapper: a bounded site crawler that emits Sitemap 0.9 XML
//!
//! This crate walks a single website breadth-first from a root URL, records
//! which in-domain pages link to which, and serializes the visited pages in
//! the Sitemap Protocol 0.9 format.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Sitemapper operations
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Per-page fetch failures
///
/// These never abort a build. The page is recorded as unreachable and the
/// error is carried in the build report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Could not parse page: {0}")]
    Parse(String),
}

/// Sitemap export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write sitemap: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Sitemap holds {count} URLs, the protocol allows at most {limit}")]
    TooManyUrls { count: usize, limit: usize },
}

/// Result type alias for Sitemapper operations
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlerConfig};
pub use crawler::{build, build_with_cancel, cancel_pair, BuildReport, PageFetcher};
pub use graph::{Link, PageNode, PageStatus, SiteGraph};
pub use output::{to_xml, write_sitemap};
pub use crate::url::{classify, LinkClassification, LinkClassifier};
