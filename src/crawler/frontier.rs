//! Breadth-first frontier of URLs waiting to be fetched
//!
//! This module handles:
//! - FIFO ordering of `(url, depth)` entries
//! - The depth bound applied at enqueue time
//! - Deduplication through the build's `VisitSet`
//! - Handing out one BFS level at a time, capped by the remaining page budget

use crate::graph::VisitSet;
use std::collections::VecDeque;

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// Canonical URL to fetch
    pub url: String,

    /// BFS depth (root is 0)
    pub depth: u32,
}

/// Frontier manages the BFS queue and the set of URLs it has ever accepted
///
/// A URL is marked visited when it is enqueued, not when it is fetched, so
/// each URL enters the queue at most once no matter how many pages link to it.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    visited: VisitSet,
    depth_bound: Option<u32>,
}

impl Frontier {
    /// Creates a frontier seeded with the root at depth 0
    ///
    /// # Arguments
    ///
    /// * `root` - Canonical root URL
    /// * `depth_bound` - Maximum depth to enqueue, `None` for unlimited
    pub fn new(root: &str, depth_bound: Option<u32>) -> Self {
        let mut visited = VisitSet::new();
        visited.try_insert(root);

        let mut queue = VecDeque::new();
        queue.push_back(QueuedUrl {
            url: root.to_string(),
            depth: 0,
        });

        Self {
            queue,
            visited,
            depth_bound,
        }
    }

    /// Returns true if pages at `depth` may be enqueued
    pub fn within_bound(&self, depth: u32) -> bool {
        self.depth_bound.map_or(true, |bound| depth <= bound)
    }

    /// Enqueues `url` at `depth`
    ///
    /// Returns false if the depth exceeds the bound or the URL was already
    /// accepted earlier in this build.
    pub fn enqueue(&mut self, url: &str, depth: u32) -> bool {
        if !self.within_bound(depth) {
            return false;
        }
        if !self.visited.try_insert(url) {
            return false;
        }

        self.queue.push_back(QueuedUrl {
            url: url.to_string(),
            depth,
        });
        true
    }

    /// Removes up to `budget` entries that share the depth of the queue head
    ///
    /// Entries are returned in FIFO order. Because children are always one
    /// level deeper than their parent, a level never interleaves with the next.
    pub fn pop_level(&mut self, budget: usize) -> Vec<QueuedUrl> {
        let mut level = Vec::new();
        let Some(depth) = self.queue.front().map(|q| q.depth) else {
            return level;
        };

        while level.len() < budget {
            match self.queue.front() {
                Some(next) if next.depth == depth => {
                    if let Some(queued) = self.queue.pop_front() {
                        level.push(queued);
                    }
                }
                _ => break,
            }
        }

        level
    }

    /// Number of URLs waiting to be fetched
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct URLs ever accepted, including the root
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
