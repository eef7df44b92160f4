use serde::Deserialize;
use std::time::Duration;

/// Default maximum crawl depth from the root page
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default hard ceiling on the number of fetches in one build
pub const DEFAULT_PAGE_LIMIT: u32 = 500;

/// Default per-fetch timeout in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Main configuration structure for Sitemapper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl behavior configuration consumed by the site graph builder
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Absolute http(s) URL the crawl starts from
    #[serde(rename = "root-host")]
    pub root_host: String,

    /// Maximum link depth from the root page
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Ignore `max_depth` and only stop at `page_limit`
    #[serde(rename = "unlimited-depth", default)]
    pub unlimited_depth: bool,

    /// Hard cap on the total number of fetches
    #[serde(rename = "page-limit", default = "default_page_limit")]
    pub page_limit: u32,

    /// Per-fetch timeout (milliseconds)
    #[serde(rename = "fetch-timeout-ms", default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: u32,
}

impl CrawlerConfig {
    /// Creates a configuration for `root_host` with default limits
    pub fn new(root_host: impl Into<String>) -> Self {
        Self {
            root_host: root_host.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            unlimited_depth: false,
            page_limit: DEFAULT_PAGE_LIMIT,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self.unlimited_depth = false;
        self
    }

    /// Removes the depth bound; `page_limit` still applies
    pub fn with_unlimited_depth(mut self) -> Self {
        self.unlimited_depth = true;
        self
    }

    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Sets the fetch timeout, rounding a sub-millisecond duration up to 1ms
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.fetch_timeout_ms = if millis == 0 && !timeout.is_zero() {
            1
        } else {
            millis
        };
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max_concurrent_fetches: u32) -> Self {
        self.max_concurrent_fetches = max_concurrent_fetches;
        self
    }

    /// Returns the depth bound, or `None` when depth is unlimited
    pub fn depth_bound(&self) -> Option<u32> {
        if self.unlimited_depth {
            None
        } else {
            Some(self.max_depth)
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the sitemap XML file
    #[serde(rename = "sitemap-path", default = "default_sitemap_path")]
    pub sitemap_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sitemap_path: default_sitemap_path(),
        }
    }
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

fn default_max_concurrent_fetches() -> u32 {
    1
}

fn default_sitemap_path() -> String {
    "sitemap.xml".to_string()
}
