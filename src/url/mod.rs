//! URL handling module for Sitemapper
//!
//! This module provides URL canonicalization, same-site host comparison and
//! the link classifier that decides which hrefs the crawler may follow.

mod domain;
mod normalize;

pub use domain::{extract_domain, same_site, site_host};
pub use normalize::{canonicalize, parse_root};

use crate::UrlResult;
use url::{ParseError, Url};

/// Schemes that never lead to a crawlable page
const UNTRAVERSABLE_SCHEMES: &[&str] = &["mailto:", "javascript:", "tel:", "data:"];

/// Link classification result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkClassification {
    /// Same site as the crawl root; carries the canonical URL
    InDomain(String),
    /// Points at another site, or could not be classified safely
    External,
    /// Not a traversable link at all (fragment, mailto:, javascript:, ...)
    Invalid,
}

impl LinkClassification {
    /// Returns true if the link should be followed
    pub fn is_in_domain(&self) -> bool {
        matches!(self, Self::InDomain(_))
    }

    /// Returns the canonical URL of an in-domain link
    pub fn canonical_url(&self) -> Option<&str> {
        match self {
            Self::InDomain(url) => Some(url),
            _ => None,
        }
    }
}

/// Classifies an href relative to the crawl's base host
///
/// # Rules
///
/// Applied in order:
/// 1. Empty, fragment-only (`#...`), `mailto:`, `javascript:`, `tel:` and
///    `data:` hrefs are `Invalid`
/// 2. Root-relative (`/x`) and relative paths are resolved against
///    `base_host`, which makes them `InDomain`. A single leading `/` always
///    starts a path, even when backslashes or tabs follow it.
/// 3. Absolute http(s) URLs are `InDomain` when their host equals the base
///    host (case-insensitive, ignoring a leading `www.`), else `External`.
///    Protocol-relative hrefs (`//host/x`) borrow the base scheme first.
///    In-domain URLs are rebased onto the scheme, host and port of
///    `base_host`, so each page has a single canonical form.
/// 4. Everything else is `External`
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemapper::url::{classify, LinkClassification};
///
/// let base = Url::parse("http://example.com").unwrap();
/// assert_eq!(
///     classify("/about", &base),
///     LinkClassification::InDomain("http://example.com/about".to_string())
/// );
/// assert_eq!(classify("http://other.com", &base), LinkClassification::External);
/// assert_eq!(classify("#top", &base), LinkClassification::Invalid);
/// ```
pub fn classify(href: &str, base_host: &Url) -> LinkClassification {
    classify_against(href, base_host, base_host)
}

/// Classifies `href` found on `page`, comparing hosts against `root`
fn classify_against(href: &str, root: &Url, page: &Url) -> LinkClassification {
    let href = href.trim();

    if is_untraversable(href) {
        return LinkClassification::Invalid;
    }

    if let Some(rest) = href.strip_prefix("//") {
        return match Url::parse(&format!("{}://{}", page.scheme(), rest)) {
            Ok(absolute) => classify_absolute(&absolute, root),
            Err(_) => LinkClassification::External,
        };
    }

    if href.starts_with('/') {
        // `url` reads `\` as `/` and drops tabs, which would turn `/\host` into
        // a protocol-relative link
        let rest = href.trim_start_matches(|c| matches!(c, '/' | '\\' | '\t' | '\n' | '\r'));
        return match page.join(&format!("/{}", rest)) {
            Ok(resolved) => classify_absolute(&resolved, root),
            Err(_) => LinkClassification::External,
        };
    }

    match Url::parse(href) {
        Ok(absolute) => classify_absolute(&absolute, root),
        Err(ParseError::RelativeUrlWithoutBase) => match page.join(href) {
            Ok(resolved) => classify_absolute(&resolved, root),
            Err(_) => LinkClassification::External,
        },
        Err(_) => LinkClassification::External,
    }
}

/// Classifies an already absolute URL by host
fn classify_absolute(url: &Url, root: &Url) -> LinkClassification {
    if url.scheme() != "http" && url.scheme() != "https" {
        return LinkClassification::External;
    }

    if same_site(url, root) {
        let mut rebased = root.clone();
        rebased.set_path(url.path());
        rebased.set_query(url.query());
        LinkClassification::InDomain(canonicalize(&rebased))
    } else {
        LinkClassification::External
    }
}

/// Checks rule 1: hrefs that can never be fetched as pages
fn is_untraversable(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return true;
    }

    UNTRAVERSABLE_SCHEMES.iter().any(|scheme| {
        href.get(..scheme.len())
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Classifier bound to one crawl root
///
/// Holds the parsed root so each link does not re-parse it. Links found on
/// deeper pages should go through [`LinkClassifier::classify_on_page`] so
/// that relative paths resolve against the page that contains them.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    root: Url,
    root_canonical: String,
}

impl LinkClassifier {
    /// Creates a classifier for the given root URL
    pub fn new(root_host: &str) -> UrlResult<Self> {
        let root = parse_root(root_host)?;
        let root_canonical = canonicalize(&root);
        Ok(Self {
            root,
            root_canonical,
        })
    }

    /// The parsed root URL
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// The canonical form of the root URL (the key of the root page)
    pub fn root_canonical(&self) -> &str {
        &self.root_canonical
    }

    /// Classifies an href with relative paths resolved against the root
    pub fn classify(&self, href: &str) -> LinkClassification {
        classify_against(href, &self.root, &self.root)
    }

    /// Classifies an href found on `page`
    ///
    /// Relative paths resolve against `page`; the same-site check is still
    /// made against the root host.
    pub fn classify_on_page(&self, href: &str, page: &Url) -> LinkClassification {
        classify_against(href, &self.root, page)
    }
}
