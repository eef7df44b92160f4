//! Output module for serializing build results
//!
//! This module handles:
//! - Rendering the site graph as a Sitemap 0.9 XML document
//! - Writing the sitemap to disk and reading one back
//! - Summarizing build statistics for the terminal

mod sitemap;
pub mod stats;

pub use sitemap::{
    parse_sitemap, to_xml, write_sitemap, MAX_URLS_PER_SITEMAP, SITEMAP_NAMESPACE,
};
pub use stats::{print_statistics, BuildStatistics};
