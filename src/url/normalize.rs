use crate::{UrlError, UrlResult};
use url::{Position, Url};

/// Parses and checks the root URL of a crawl
///
/// The root must be an absolute `http` or `https` URL with a host.
pub fn parse_root(root: &str) -> UrlResult<Url> {
    let url = Url::parse(root.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}

/// Produces the canonical string form of a URL
///
/// # Canonical Form
///
/// 1. Scheme, lowercased host and explicit port are kept as parsed
/// 2. Path is normalized:
///    - Remove dot segments (. and ..)
///    - Collapse duplicate slashes
///    - Remove trailing slash; the site root is the bare origin
/// 3. Fragment is dropped
/// 4. A non-empty query is kept verbatim
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemapper::url::canonicalize;
///
/// let url = Url::parse("http://Example.COM/a//b/../c/#top").unwrap();
/// assert_eq!(canonicalize(&url), "http://example.com/a/c");
///
/// let root = Url::parse("http://example.com/").unwrap();
/// assert_eq!(canonicalize(&root), "http://example.com");
/// ```
pub fn canonicalize(url: &Url) -> String {
    let mut canonical = url[..Position::BeforePath].to_string();
    canonical.push_str(&normalize_path(url.path()));

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        canonical.push('?');
        canonical.push_str(query);
    }

    canonical
}

/// Normalizes a URL path by removing dot segments, duplicate and trailing slashes
///
/// The root path normalizes to the empty string.
fn normalize_path(path: &str) -> String {
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            // Skip empty segments (from multiple slashes) and current directory markers
            "" | "." => continue,
            // Parent directory - pop the last segment if possible
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return String::new();
    }

    format!("/{}", normalized_segments.join("/"))
}
