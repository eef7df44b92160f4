use crate::graph::page::{PageNode, PageStatus};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Mapping from canonical URL to the page visited at that URL
///
/// Keys are kept sorted so iteration (and the sitemap built from it) is
/// reproducible. Each key equals its node's `url`; a URL can only be
/// inserted once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteGraph {
    root: String,
    pages: BTreeMap<String, PageNode>,
}

impl SiteGraph {
    /// Creates an empty graph for the given canonical root URL
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            pages: BTreeMap::new(),
        }
    }

    /// Canonical URL the build started from
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The root page, if it has been inserted
    pub fn root_page(&self) -> Option<&PageNode> {
        self.pages.get(&self.root)
    }

    /// Inserts a page keyed by its URL
    ///
    /// Returns false and leaves the graph unchanged if the URL is already present.
    pub fn insert(&mut self, page: PageNode) -> bool {
        match self.pages.entry(page.url().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(page);
                true
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<&PageNode> {
        self.pages.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page URLs in lexicographic order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Pages in URL order
    pub fn pages(&self) -> impl Iterator<Item = &PageNode> {
        self.pages.values()
    }

    /// Total number of outbound in-domain links across all pages
    pub fn edge_count(&self) -> usize {
        self.pages.values().map(|p| p.outbound_links().len()).sum()
    }

    /// Number of pages with the given status
    pub fn count_by_status(&self, status: PageStatus) -> usize {
        self.pages.values().filter(|p| p.status() == status).count()
    }
}
