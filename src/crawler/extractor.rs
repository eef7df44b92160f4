//! HTML link extraction
//!
//! This module turns a parsed HTML document into the ordered list of anchors
//! it contains. Parsing itself is delegated to `scraper` (html5ever).

use crate::graph::Link;
use scraper::{ElementRef, Html};

/// Upper bound on the number of document nodes visited per page
///
/// Traversal is iterative, so this is not a stack guard; it caps the work
/// spent on generated or hostile documents.
pub const MAX_DOCUMENT_NODES: usize = 1_000_000;

/// Parses an HTML body into a document tree
///
/// html5ever recovers from any malformed input, so this never fails.
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Extracts every anchor with an `href` attribute, in document order
///
/// # Extraction Rules
///
/// - Nodes are visited depth-first, pre-order (first child before sibling)
/// - Only `<a>` elements with an `href` attribute produce a link; an anchor
///   without one is not a link. An empty `href` is still reported.
/// - The link text is every descendant text node concatenated in document
///   order, with whitespace runs collapsed to one space and trimmed
///
/// # Example
///
/// ```
/// use sitemapper::crawler::{extract_links, parse_document};
///
/// let document = parse_document(r#"<p><a href="/about">About
///     <b>us</b></a><a name="top">Top</a></p>"#);
/// let links = extract_links(&document);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].href(), "/about");
/// assert_eq!(links[0].text(), "About us");
/// ```
pub fn extract_links(document: &Html) -> Vec<Link> {
    let mut links = Vec::new();

    for node in document.tree.root().descendants().take(MAX_DOCUMENT_NODES) {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };

        if element.value().name() != "a" {
            continue;
        }

        if let Some(href) = element.value().attr("href") {
            links.push(Link::new(href, collapse_whitespace(element.text())));
        }
    }

    links
}

/// Convenience function for extracting links straight from markup
pub fn extract_links_from_html(html: &str) -> Vec<Link> {
    extract_links(&parse_document(html))
}

/// Joins text fragments and normalizes whitespace
fn collapse_whitespace<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    let joined: String = fragments.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
