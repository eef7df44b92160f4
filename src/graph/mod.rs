//! Site graph data model
//!
//! # Components
//!
//! - `Link`: an anchor's href and visible text
//! - `PageNode`: one visited page and its outbound in-domain links
//! - `SiteGraph`: canonical URL → `PageNode`, sorted by URL
//! - `VisitSet`: URLs already fetched or enqueued during a build
//!
//! All of these live for a single build; nothing is persisted.

mod page;
mod site_graph;
mod visit_set;

pub use page::{Link, PageNode, PageStatus};
pub use site_graph::SiteGraph;
pub use visit_set::VisitSet;
