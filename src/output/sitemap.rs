//! Sitemap Protocol 0.9 serialization
//!
//! One `<url><loc>` entry is written per page of the graph, in URL order.
//! Edges are not part of the format.

use crate::graph::SiteGraph;
use crate::ExportError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::path::Path;

/// XML namespace of the Sitemap Protocol 0.9
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Maximum number of URLs a single sitemap file may list
pub const MAX_URLS_PER_SITEMAP: usize = 50_000;

/// Renders the graph as a sitemap document
///
/// # Example
///
/// ```
/// use sitemapper::graph::{PageNode, SiteGraph};
/// use sitemapper::output::to_xml;
///
/// let mut graph = SiteGraph::new("http://example.com");
/// graph.insert(PageNode::fetched("http://example.com", 0, Vec::new()));
///
/// let xml = String::from_utf8(to_xml(&graph).unwrap()).unwrap();
/// assert!(xml.contains("<loc>http://example.com</loc>"));
/// ```
pub fn to_xml(graph: &SiteGraph) -> Result<Vec<u8>, ExportError> {
    if graph.len() > MAX_URLS_PER_SITEMAP {
        return Err(ExportError::TooManyUrls {
            count: graph.len(),
            limit: MAX_URLS_PER_SITEMAP,
        });
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_event(
        &mut writer,
        Event::Start(BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)])),
    )?;

    for url in graph.urls() {
        write_event(&mut writer, Event::Start(BytesStart::new("url")))?;
        write_event(&mut writer, Event::Start(BytesStart::new("loc")))?;
        write_event(&mut writer, Event::Text(BytesText::new(url)))?;
        write_event(&mut writer, Event::End(BytesEnd::new("loc")))?;
        write_event(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("urlset")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Writes the sitemap for `graph` to `path`
///
/// On failure the graph is untouched, so the call can be retried with a
/// different path.
pub fn write_sitemap(graph: &SiteGraph, path: &Path) -> Result<(), ExportError> {
    let bytes = to_xml(graph)?;
    std::fs::write(path, bytes)?;

    tracing::info!("Wrote {} URLs to {}", graph.len(), path.display());
    Ok(())
}

/// Reads the `<loc>` values of a sitemap document, in document order
pub fn parse_sitemap(bytes: &[u8]) -> Result<Vec<String>, ExportError> {
    let xml = std::str::from_utf8(bytes).map_err(|e| ExportError::Xml(e.to_string()))?;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locs = Vec::new();
    let mut in_loc = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"loc" => in_loc = true,
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"loc" => in_loc = false,
            Ok(Event::Text(ref e)) if in_loc => {
                let text = e.unescape().map_err(|e| ExportError::Xml(e.to_string()))?;
                locs.push(text.into_owned());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExportError::Xml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(locs)
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ExportError> {
    writer
        .write_event(event)
        .map_err(|e| ExportError::Xml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, PageNode};
    use tempfile::TempDir;

    fn graph_of(urls: &[&str]) -> SiteGraph {
        let mut graph = SiteGraph::new(urls[0]);
        for url in urls {
            graph.insert(PageNode::fetched(*url, 0, Vec::new()));
        }
        graph
    }

    #[test]
    fn test_document_shape() {
        let mut graph = SiteGraph::new("http://example.com");
        graph.insert(PageNode::fetched(
            "http://example.com",
            0,
            vec![Link::new("http://example.com/about", "About")],
        ));
        graph.insert(PageNode::unreachable("http://example.com/about", 1));

        let xml = String::from_utf8(to_xml(&graph).unwrap()).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains("<loc>http://example.com</loc>"));
        assert!(xml.contains("<loc>http://example.com/about</loc>"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_round_trip_matches_keys() {
        let graph = graph_of(&[
            "http://example.com",
            "http://example.com/b",
            "http://example.com/a",
            "http://example.com/a/deeper",
        ]);

        let locs = parse_sitemap(&to_xml(&graph).unwrap()).unwrap();
        let keys: Vec<_> = graph.urls().map(str::to_string).collect();
        assert_eq!(locs, keys);
    }

    #[test]
    fn test_entries_sorted() {
        let graph = graph_of(&["http://example.com/z", "http://example.com/a", "http://example.com"]);
        let locs = parse_sitemap(&to_xml(&graph).unwrap()).unwrap();
        assert_eq!(
            locs,
            vec!["http://example.com", "http://example.com/a", "http://example.com/z"]
        );
    }

    #[test]
    fn test_special_characters_escaped() {
        let graph = graph_of(&["http://example.com", "http://example.com/search?a=1&b=<2>"]);

        let bytes = to_xml(&graph).unwrap();
        let xml = String::from_utf8(bytes.clone()).unwrap();
        assert!(xml.contains("a=1&amp;b=&lt;2&gt;"));
        assert!(!xml.contains("a=1&b"));

        let locs = parse_sitemap(&bytes).unwrap();
        assert!(locs.contains(&"http://example.com/search?a=1&b=<2>".to_string()));
    }

    #[test]
    fn test_empty_graph() {
        let graph = SiteGraph::new("http://example.com");
        let locs = parse_sitemap(&to_xml(&graph).unwrap()).unwrap();
        assert!(locs.is_empty());
    }

    #[test]
    fn test_too_many_urls() {
        let mut graph = SiteGraph::new("http://example.com");
        for i in 0..=MAX_URLS_PER_SITEMAP {
            graph.insert(PageNode::not_fetched(format!("http://example.com/{}", i), 1));
        }

        let result = to_xml(&graph);
        assert!(matches!(
            result,
            Err(ExportError::TooManyUrls { count, limit })
                if count == MAX_URLS_PER_SITEMAP + 1 && limit == MAX_URLS_PER_SITEMAP
        ));
    }

    #[test]
    fn test_write_sitemap() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sitemap.xml");
        let graph = graph_of(&["http://example.com", "http://example.com/about"]);

        write_sitemap(&graph, &path).unwrap();

        let locs = parse_sitemap(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(locs.len(), 2);
    }

    #[test]
    fn test_write_failure_is_io() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing-dir").join("sitemap.xml");
        let graph = graph_of(&["http://example.com"]);

        let result = write_sitemap(&graph, &path);
        assert!(matches!(result, Err(ExportError::Io(_))));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_parse_rejects_broken_xml() {
        let result = parse_sitemap(b"<urlset><url><loc>x</url></urlset>");
        assert!(matches!(result, Err(ExportError::Xml(_))));
    }
}
