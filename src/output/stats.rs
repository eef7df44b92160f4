//! Statistics generation from a build report
//!
//! This module provides functionality for summarizing a finished build and
//! displaying it on the terminal.

use crate::crawler::BuildReport;
use crate::graph::PageStatus;
use std::collections::BTreeMap;
use std::time::Duration;

/// Build statistics summary
#[derive(Debug, Clone)]
pub struct BuildStatistics {
    /// Total number of pages in the graph
    pub total_pages: usize,

    /// Pages fetched and parsed
    pub pages_fetched: usize,

    /// Pages whose fetch failed
    pub pages_unreachable: usize,

    /// Total number of in-domain links recorded
    pub total_links: usize,

    /// Count of pages at each BFS depth
    pub pages_by_depth: BTreeMap<u32, usize>,

    /// Unreachable URLs with the reason
    pub unreachable: Vec<(String, String)>,

    /// Whether the build was cancelled
    pub cancelled: bool,

    /// Whether the page limit stopped the build
    pub page_limit_reached: bool,

    /// Build duration
    pub elapsed: Duration,
}

impl BuildStatistics {
    /// Collects statistics from a finished build
    pub fn from_report(report: &BuildReport) -> Self {
        let graph = &report.graph;

        let mut pages_by_depth = BTreeMap::new();
        for page in graph.pages() {
            *pages_by_depth.entry(page.depth()).or_insert(0) += 1;
        }

        Self {
            total_pages: graph.len(),
            pages_fetched: graph.count_by_status(PageStatus::Fetched),
            pages_unreachable: graph.count_by_status(PageStatus::Unreachable),
            total_links: graph.edge_count(),
            pages_by_depth,
            unreachable: report
                .unreachable
                .iter()
                .map(|page| (page.url.clone(), page.error.to_string()))
                .collect(),
            cancelled: report.cancelled,
            page_limit_reached: report.page_limit_reached,
            elapsed: report.elapsed,
        }
    }

    /// Percentage of graph pages that were fetched successfully
    pub fn success_rate(&self) -> f64 {
        if self.total_pages > 0 {
            (self.pages_fetched as f64 / self.total_pages as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &BuildStatistics) {
    println!("=== Build Statistics ===\n");

    println!("Overview:");
    println!("  Pages in sitemap: {}", stats.total_pages);
    println!("  In-domain links: {}", stats.total_links);
    println!("  Duration: {:.2?}", stats.elapsed);
    if stats.cancelled {
        println!("  Build was cancelled; the graph is partial");
    }
    if stats.page_limit_reached {
        println!("  Page limit reached; some pages were not visited");
    }
    println!();

    println!("Pages by Depth:");
    for (depth, count) in &stats.pages_by_depth {
        println!("  {}: {}", depth, count);
    }
    println!();

    if !stats.unreachable.is_empty() {
        println!("Unreachable Pages ({}):", stats.unreachable.len());
        for (url, reason) in &stats.unreachable {
            println!("  - {} ({})", url, reason);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        stats.success_rate(),
        stats.pages_fetched,
        stats.total_pages
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::UnreachablePage;
    use crate::graph::{Link, PageNode, SiteGraph};
    use crate::FetchError;

    fn report() -> BuildReport {
        let mut graph = SiteGraph::new("http://example.com");
        graph.insert(PageNode::fetched(
            "http://example.com",
            0,
            vec![
                Link::new("http://example.com/a", "A"),
                Link::new("http://example.com/b", "B"),
            ],
        ));
        graph.insert(PageNode::fetched("http://example.com/a", 1, Vec::new()));
        graph.insert(PageNode::unreachable("http://example.com/b", 1));

        BuildReport {
            graph,
            unreachable: vec![UnreachablePage {
                url: "http://example.com/b".to_string(),
                depth: 1,
                error: FetchError::Status(500),
            }],
            pages_fetched: 3,
            cancelled: false,
            page_limit_reached: false,
            elapsed: Duration::from_millis(120),
        }
    }

    #[test]
    fn test_from_report() {
        let stats = BuildStatistics::from_report(&report());

        assert_eq!(stats.total_pages, 3);
        assert_eq!(stats.pages_fetched, 2);
        assert_eq!(stats.pages_unreachable, 1);
        assert_eq!(stats.total_links, 2);
        assert_eq!(stats.pages_by_depth.get(&0), Some(&1));
        assert_eq!(stats.pages_by_depth.get(&1), Some(&2));
        assert_eq!(
            stats.unreachable,
            vec![("http://example.com/b".to_string(), "HTTP status 500".to_string())]
        );
    }

    #[test]
    fn test_success_rate() {
        let stats = BuildStatistics::from_report(&report());
        assert!((stats.success_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_success_rate_empty() {
        let mut report = report();
        report.graph = SiteGraph::new("http://example.com");
        assert_eq!(BuildStatistics::from_report(&report).success_rate(), 0.0);
    }
}
