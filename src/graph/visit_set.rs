use std::collections::HashSet;

/// Canonical URLs already fetched or enqueued during one build
#[derive(Debug, Clone, Default)]
pub struct VisitSet {
    urls: HashSet<String>,
}

impl VisitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as visited
    ///
    /// Returns true only for the first caller; this is the single
    /// check-and-insert the builder uses before enqueueing a URL.
    pub fn try_insert(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
