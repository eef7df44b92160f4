//! Page and link value types
//!
//! A `PageNode` is created once per visited URL and never mutated afterwards.
use std::collections::HashSet;
use std::fmt;

/// An anchor found in a document: raw `href` plus its flattened visible text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    href: String,
    text: String,
}

impl Link {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} - {}}}", self.href, self.text)
    }
}

/// Represents the outcome of visiting a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageStatus {
    /// Page was fetched and its links extracted
    Fetched,

    /// Fetch failed (network, timeout, non-2xx or unparsable body)
    Unreachable,

    /// Page was part of the graph but never fetched because the build was cancelled
    NotFetched,
}

impl PageStatus {
    /// Returns true if this represents a successful fetch
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Fetched)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetched => "fetched",
            Self::Unreachable => "unreachable",
            Self::NotFetched => "not_fetched",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One visited page of the site graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNode {
    url: String,
    outbound_links: Vec<Link>,
    status: PageStatus,
    depth: u32,
}

impl PageNode {
    /// Creates a fetched page
    ///
    /// `links` are deduplicated by href, keeping the first occurrence and
    /// the original order.
    pub fn fetched(url: impl Into<String>, depth: u32, links: Vec<Link>) -> Self {
        let mut seen = HashSet::new();
        let outbound_links = links
            .into_iter()
            .filter(|link| seen.insert(link.href.clone()))
            .collect();

        Self {
            url: url.into(),
            outbound_links,
            status: PageStatus::Fetched,
            depth,
        }
    }

    /// Creates a page whose fetch failed; it has no outbound links
    pub fn unreachable(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            outbound_links: Vec::new(),
            status: PageStatus::Unreachable,
            depth,
        }
    }

    /// Creates a placeholder for a page that was never fetched
    pub fn not_fetched(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            outbound_links: Vec::new(),
            status: PageStatus::NotFetched,
            depth,
        }
    }

    /// Canonical URL of the page
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn outbound_links(&self) -> &[Link] {
        &self.outbound_links
    }

    /// Canonical URLs of the in-domain pages this page links to
    pub fn outbound_urls(&self) -> impl Iterator<Item = &str> {
        self.outbound_links.iter().map(Link::href)
    }

    pub fn status(&self) -> PageStatus {
        self.status
    }

    /// BFS depth at which the page was visited (root is 0)
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetched_dedups_by_href() {
        let page = PageNode::fetched(
            "http://example.com",
            0,
            vec![
                Link::new("http://example.com/a", "First"),
                Link::new("http://example.com/b", "B"),
                Link::new("http://example.com/a", "Second"),
            ],
        );

        let urls: Vec<_> = page.outbound_urls().collect();
        assert_eq!(urls, vec!["http://example.com/a", "http://example.com/b"]);
        assert_eq!(page.outbound_links()[0].text(), "First");
        assert_eq!(page.status(), PageStatus::Fetched);
    }

    #[test]
    fn test_unreachable_has_no_links() {
        let page = PageNode::unreachable("http://example.com/down", 2);
        assert!(page.outbound_links().is_empty());
        assert_eq!(page.depth(), 2);
        assert!(!page.status().is_success());
    }

    #[test]
    fn test_link_display() {
        let link = Link::new("/about", "About us");
        assert_eq!(link.to_string(), "{/about - About us}");
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(PageStatus::Fetched.as_str(), "fetched");
        assert_eq!(PageStatus::Unreachable.to_string(), "unreachable");
        assert_eq!(PageStatus::NotFetched.as_str(), "not_fetched");
    }
}
